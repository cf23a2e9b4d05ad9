//! The data-driven rule table the parser evaluates.
//!
//! Every rule pairs a pattern with the domain it addresses, the canonical
//! value token it produces, and a confidence. Keeping the table as plain
//! data keeps the winner selection centralized in one place instead of
//! spread across per-rule conditionals.

use crate::types::Domain;

/// How a rule matches against the normalized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Multi-word phrase, word-boundary delimited on both ends.
    Phrase(&'static str),
    /// Single word-boundary token.
    Keyword(&'static str),
    /// Ambiguous bare token (e.g. the letter `r`, which could be a display
    /// mode or a ticker fragment). Only fires when a context keyword is
    /// present elsewhere in the utterance, or a relative marker refers to
    /// a current value the rule would change.
    Guarded(&'static str),
}

impl Pattern {
    pub fn text(&self) -> &'static str {
        match self {
            Pattern::Phrase(p) | Pattern::Keyword(p) | Pattern::Guarded(p) => p,
        }
    }
}

/// One entry in the rule table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub pattern: Pattern,
    pub domain: Domain,
    /// Canonical value token emitted when the rule fires.
    pub value: &'static str,
    /// Confidence in `[0, 1]`; literal matches score 1.0, synonyms lower.
    pub confidence: f64,
}

const fn phrase(pattern: &'static str, domain: Domain, value: &'static str, confidence: f64) -> Rule {
    Rule { pattern: Pattern::Phrase(pattern), domain, value, confidence }
}

const fn keyword(pattern: &'static str, domain: Domain, value: &'static str, confidence: f64) -> Rule {
    Rule { pattern: Pattern::Keyword(pattern), domain, value, confidence }
}

const fn guarded(pattern: &'static str, domain: Domain, value: &'static str, confidence: f64) -> Rule {
    Rule { pattern: Pattern::Guarded(pattern), domain, value, confidence }
}

/// Words that unlock guarded tokens anywhere in the utterance.
pub const CONTEXT_KEYWORDS: &[&str] = &["mode", "view", "display", "switch", "in", "units"];

/// Markers of a relative phrase ("switch it to…"); combined with the UI
/// snapshot they unlock guarded tokens that would change the current value.
pub const RELATIVE_MARKERS: &[&str] = &["it", "that"];

static RULES: &[Rule] = &[
    // Navigation.
    keyword("dashboard", Domain::Navigation, "dashboard", 1.0),
    keyword("home", Domain::Navigation, "dashboard", 0.8),
    keyword("overview", Domain::Navigation, "dashboard", 0.7),
    keyword("statistics", Domain::Navigation, "statistics", 1.0),
    keyword("stats", Domain::Navigation, "statistics", 0.9),
    keyword("trades", Domain::Navigation, "trades", 1.0),
    phrase("trade log", Domain::Navigation, "trades", 1.0),
    phrase("trade history", Domain::Navigation, "trades", 1.0),
    keyword("journal", Domain::Navigation, "trades", 0.8),
    keyword("calendar", Domain::Navigation, "calendar", 1.0),
    keyword("settings", Domain::Navigation, "settings", 1.0),
    keyword("preferences", Domain::Navigation, "settings", 0.9),
    // Date range.
    keyword("today", Domain::DateRange, "today", 1.0),
    keyword("yesterday", Domain::DateRange, "yesterday", 1.0),
    phrase("this week", Domain::DateRange, "thisWeek", 1.0),
    phrase("last week", Domain::DateRange, "lastWeek", 1.0),
    phrase("past week", Domain::DateRange, "lastWeek", 0.8),
    phrase("this month", Domain::DateRange, "thisMonth", 1.0),
    phrase("last month", Domain::DateRange, "lastMonth", 1.0),
    phrase("past month", Domain::DateRange, "lastMonth", 0.8),
    phrase("this year", Domain::DateRange, "thisYear", 1.0),
    phrase("year to date", Domain::DateRange, "thisYear", 0.9),
    keyword("ytd", Domain::DateRange, "thisYear", 0.9),
    phrase("all time", Domain::DateRange, "all", 1.0),
    keyword("alltime", Domain::DateRange, "all", 0.9),
    keyword("everything", Domain::DateRange, "all", 0.7),
    guarded("all", Domain::DateRange, "all", 0.55),
    // Display mode. The bare letter `r` collides with ticker-style tokens,
    // so it is guarded; the spelled-out forms are not.
    phrase("r multiple", Domain::DisplayMode, "r", 1.0),
    phrase("r multiples", Domain::DisplayMode, "r", 1.0),
    phrase("in r", Domain::DisplayMode, "r", 1.0),
    guarded("r", Domain::DisplayMode, "r", 0.6),
    keyword("dollars", Domain::DisplayMode, "dollar", 1.0),
    keyword("dollar", Domain::DisplayMode, "dollar", 1.0),
    keyword("usd", Domain::DisplayMode, "dollar", 0.9),
    keyword("$", Domain::DisplayMode, "dollar", 0.9),
    keyword("percent", Domain::DisplayMode, "percent", 1.0),
    keyword("percentage", Domain::DisplayMode, "percent", 1.0),
    keyword("%", Domain::DisplayMode, "percent", 0.9),
    keyword("pct", Domain::DisplayMode, "percent", 0.8),
];

/// The full rule table, in evaluation order.
pub fn rules() -> &'static [Rule] {
    RULES
}
