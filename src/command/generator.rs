//! Normalizes parser output into canonical actions.

use crate::command::types::{
    Action, ActionPayload, Command, DateRange, DisplayMode, NavigationTarget,
};
use crate::types::Domain;

/// Derive at most one [`Action`] per domain from a batch of commands.
///
/// Commands are grouped by domain; within each group the winner is the
/// command with the highest confidence, ties broken by the later span
/// (last-mentioned intent wins). The winning value token is mapped to a
/// typed payload; a token that maps to nothing is discarded with a log
/// line rather than an error, so this stage is total: unrecognized input
/// just produces fewer actions.
///
/// Actions are emitted in the fixed domain order of [`Domain::ALL`] for
/// determinism; cross-domain ordering carries no meaning downstream.
pub fn generate(commands: &[Command]) -> Vec<Action> {
    let mut actions = Vec::new();
    for domain in Domain::ALL {
        let in_domain: Vec<&Command> = commands.iter().filter(|c| c.domain == domain).collect();
        let Some(winner) = select_winner(&in_domain) else {
            continue;
        };
        for (index, loser) in in_domain.iter().enumerate() {
            if index != winner {
                tracing::debug!(
                    domain = %domain,
                    value = %loser.value,
                    confidence = loser.confidence,
                    "command discarded by conflict resolution"
                );
            }
        }
        let winning = in_domain[winner];
        match payload_for(domain, &winning.value) {
            Some(payload) => actions.push(Action::new(payload)),
            None => {
                tracing::debug!(
                    domain = %domain,
                    value = %winning.value,
                    "command discarded: no canonical payload for value token"
                );
            }
        }
    }
    actions
}

/// Index of the winning command: highest confidence, ties broken by the
/// later span start. Shared with the parser so the tie-break lives in
/// exactly one place.
pub(crate) fn select_winner(commands: &[&Command]) -> Option<usize> {
    let mut winner: Option<usize> = None;
    for (index, command) in commands.iter().enumerate() {
        let better = match winner {
            None => true,
            Some(current) => {
                let best = commands[current];
                match command.confidence.partial_cmp(&best.confidence) {
                    Some(std::cmp::Ordering::Greater) => true,
                    Some(std::cmp::Ordering::Equal) => command.span_start >= best.span_start,
                    _ => false,
                }
            }
        };
        if better {
            winner = Some(index);
        }
    }
    winner
}

fn payload_for(domain: Domain, value: &str) -> Option<ActionPayload> {
    match domain {
        Domain::Navigation => NavigationTarget::from_token(value).map(ActionPayload::Navigate),
        Domain::DateRange => DateRange::from_token(value).map(ActionPayload::SetDateRange),
        Domain::DisplayMode => DisplayMode::from_token(value).map(ActionPayload::SetDisplayMode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(domain: Domain, value: &str, confidence: f64, span_start: usize) -> Command {
        Command {
            domain,
            value: value.to_string(),
            confidence,
            source_span: value.to_string(),
            span_start,
        }
    }

    #[test]
    fn one_action_per_represented_domain() {
        let commands = vec![
            command(Domain::Navigation, "statistics", 1.0, 0),
            command(Domain::DateRange, "all", 1.0, 11),
            command(Domain::DisplayMode, "r", 1.0, 20),
        ];
        let actions = generate(&commands);
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].payload, ActionPayload::Navigate(NavigationTarget::Statistics));
        assert_eq!(actions[1].payload, ActionPayload::SetDateRange(DateRange::All));
        assert_eq!(actions[2].payload, ActionPayload::SetDisplayMode(DisplayMode::RMultiple));
    }

    #[test]
    fn higher_confidence_wins() {
        let commands = vec![
            command(Domain::DisplayMode, "r", 0.6, 30),
            command(Domain::DisplayMode, "dollar", 1.0, 5),
        ];
        let actions = generate(&commands);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].payload, ActionPayload::SetDisplayMode(DisplayMode::Dollar));
    }

    #[test]
    fn confidence_tie_breaks_toward_later_span() {
        let commands = vec![
            command(Domain::DateRange, "today", 1.0, 0),
            command(Domain::DateRange, "yesterday", 1.0, 12),
        ];
        let actions = generate(&commands);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].payload, ActionPayload::SetDateRange(DateRange::Yesterday));
    }

    #[test]
    fn unknown_value_token_is_dropped_not_an_error() {
        let commands = vec![
            command(Domain::Navigation, "blotter", 1.0, 0),
            command(Domain::DateRange, "today", 1.0, 8),
        ];
        let actions = generate(&commands);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].domain, Domain::DateRange);
    }

    #[test]
    fn empty_input_yields_no_actions() {
        assert!(generate(&[]).is_empty());
    }

    #[test]
    fn actions_carry_distinct_ids() {
        let commands = vec![
            command(Domain::Navigation, "dashboard", 1.0, 0),
            command(Domain::DisplayMode, "percent", 1.0, 10),
        ];
        let actions = generate(&commands);
        assert_ne!(actions[0].id, actions[1].id);
        assert!(actions.iter().all(|a| a.is_well_formed()));
    }
}
