//! Rule evaluation over normalized chat text.

use crate::command::generator::select_winner;
use crate::command::types::Command;
use crate::intent::rules::{self, Pattern, CONTEXT_KEYWORDS, RELATIVE_MARKERS};
use crate::types::{Domain, UiSnapshot};

/// Extract every independent command present in `text`.
///
/// All rules are evaluated against the normalized input and every match is
/// collected; within each domain the winner is then selected (highest
/// confidence, ties broken by the later span — the last-mentioned intent
/// wins). At most one command per domain is returned, so an utterance like
/// "show stats all time in R" yields three commands, one per domain.
///
/// `snapshot` is read-only and is consulted only to unlock guarded tokens
/// inside relative phrases ("now switch it to…"). Deterministic for
/// identical input; no side effects.
pub fn parse(text: &str, snapshot: &UiSnapshot) -> Vec<Command> {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    let has_context = CONTEXT_KEYWORDS
        .iter()
        .any(|kw| !find_spans(&normalized, kw).is_empty());
    let has_relative = RELATIVE_MARKERS
        .iter()
        .any(|marker| !find_spans(&normalized, marker).is_empty());

    let mut candidates: Vec<Command> = Vec::new();
    for rule in rules::rules() {
        let needle = rule.pattern.text();
        for start in find_spans(&normalized, needle) {
            if let Pattern::Guarded(_) = rule.pattern {
                let changes_current = has_relative
                    && snapshot
                        .value_for(rule.domain)
                        .is_some_and(|current| current != rule.value);
                if !has_context && !changes_current {
                    tracing::debug!(
                        token = needle,
                        domain = %rule.domain,
                        "guarded token without context keyword, skipped"
                    );
                    continue;
                }
            }
            candidates.push(Command {
                domain: rule.domain,
                value: rule.value.to_string(),
                confidence: rule.confidence,
                source_span: needle.to_string(),
                span_start: start,
            });
        }
    }

    let mut commands = Vec::new();
    for domain in Domain::ALL {
        let in_domain: Vec<&Command> = candidates.iter().filter(|c| c.domain == domain).collect();
        if let Some(winner) = select_winner(&in_domain) {
            for (index, loser) in in_domain.iter().enumerate() {
                if index != winner {
                    tracing::debug!(
                        domain = %domain,
                        value = %loser.value,
                        span = %loser.source_span,
                        "candidate lost intra-domain selection"
                    );
                }
            }
            commands.push(in_domain[winner].clone());
        }
    }
    commands
}

/// Lowercase the input and map punctuation to spaces, collapsing runs.
/// `$` and `%` survive because they are display-mode tokens.
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if is_token_char(ch) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_space = true;
        }
    }
    out
}

fn is_token_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '$' || ch == '%'
}

/// Byte offsets of every word-boundary occurrence of `needle` in `haystack`.
fn find_spans(haystack: &str, needle: &str) -> Vec<usize> {
    haystack
        .match_indices(needle)
        .filter(|(start, _)| {
            let before_ok = haystack[..*start]
                .chars()
                .next_back()
                .map_or(true, |ch| !is_token_char(ch));
            let after_ok = haystack[start + needle.len()..]
                .chars()
                .next()
                .map_or(true, |ch| !is_token_char(ch));
            before_ok && after_ok
        })
        .map(|(start, _)| start)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> UiSnapshot {
        UiSnapshot::new("dashboard", "thisWeek", "dollar")
    }

    fn only(commands: &[Command], domain: Domain) -> &Command {
        commands
            .iter()
            .find(|c| c.domain == domain)
            .unwrap_or_else(|| panic!("no command for {domain}"))
    }

    #[test]
    fn multi_command_extraction() {
        let commands = parse("show stats all time in R", &snapshot());
        assert_eq!(commands.len(), 3);
        assert_eq!(only(&commands, Domain::Navigation).value, "statistics");
        assert_eq!(only(&commands, Domain::DateRange).value, "all");
        assert_eq!(only(&commands, Domain::DisplayMode).value, "r");
    }

    #[test]
    fn last_mention_wins_within_domain() {
        let commands = parse("show R and then switch to dollars", &snapshot());
        assert_eq!(commands.len(), 1);
        let command = only(&commands, Domain::DisplayMode);
        assert_eq!(command.value, "dollar");
    }

    #[test]
    fn equal_confidence_breaks_toward_later_span() {
        // Both "r multiple" and "percent" match at confidence 1.0; the one
        // mentioned last wins.
        let commands = parse("r multiple no wait percent", &snapshot());
        assert_eq!(only(&commands, Domain::DisplayMode).value, "percent");

        let commands = parse("percent no wait r multiple", &snapshot());
        assert_eq!(only(&commands, Domain::DisplayMode).value, "r");
    }

    #[test]
    fn no_match_yields_nothing() {
        assert!(parse("hello, how are you?", &snapshot()).is_empty());
        assert!(parse("", &snapshot()).is_empty());
        assert!(parse("   !!!  ", &snapshot()).is_empty());
    }

    #[test]
    fn bare_letter_requires_context() {
        // "r" alone could be a ticker fragment; without a context keyword
        // it must not fire.
        assert!(parse("bought some r today at the open", &snapshot())
            .iter()
            .all(|c| c.domain != Domain::DisplayMode));

        // A context keyword anywhere in the utterance unlocks it.
        let commands = parse("r mode please", &snapshot());
        assert_eq!(only(&commands, Domain::DisplayMode).value, "r");
    }

    #[test]
    fn relative_phrase_uses_snapshot() {
        // "switch it to r": "switch" is itself a context keyword, so strip
        // it to isolate the relative-marker path.
        let commands = parse("now set it to r", &snapshot());
        assert_eq!(only(&commands, Domain::DisplayMode).value, "r");

        // Same phrase, but the snapshot already shows r: no change implied,
        // the guarded token stays locked.
        let already_r = UiSnapshot::new("dashboard", "thisWeek", "r");
        assert!(parse("now set it to r", &already_r).is_empty());
    }

    #[test]
    fn word_boundaries_prevent_substring_hits() {
        // "rest" contains "r", "straderday" style tokens contain "trades".
        assert!(parse("taking a rest", &snapshot()).is_empty());
        assert!(parse("retrades", &snapshot()).is_empty());
    }

    #[test]
    fn punctuation_and_case_are_normalized() {
        let commands = parse("Show STATS, all-time — in R!", &snapshot());
        assert_eq!(commands.len(), 3);
        assert_eq!(only(&commands, Domain::DateRange).value, "all");
    }

    #[test]
    fn symbol_tokens_match() {
        let commands = parse("show this month in $", &snapshot());
        assert_eq!(only(&commands, Domain::DateRange).value, "thisMonth");
        assert_eq!(only(&commands, Domain::DisplayMode).value, "dollar");

        let commands = parse("switch to %", &snapshot());
        assert_eq!(only(&commands, Domain::DisplayMode).value, "percent");
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = parse("stats last month in dollars", &snapshot());
        let b = parse("stats last month in dollars", &snapshot());
        assert_eq!(a, b);
    }

    #[test]
    fn spans_point_into_normalized_text() {
        let commands = parse("go to trades", &snapshot());
        let command = only(&commands, Domain::Navigation);
        assert_eq!(command.source_span, "trades");
        assert_eq!(command.span_start, "go to ".len());
    }
}
