use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the three independently-mutable state categories a chat message
/// can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Domain {
    Navigation,
    DateRange,
    DisplayMode,
}

impl Domain {
    /// All domains, in the canonical emission order.
    pub const ALL: [Domain; 3] = [Domain::Navigation, Domain::DateRange, Domain::DisplayMode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Navigation => "navigation",
            Domain::DateRange => "dateRange",
            Domain::DisplayMode => "displayMode",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the dashboard state at the moment of parsing.
///
/// Supplied by the caller and used only to disambiguate relative phrases
/// ("now switch it to…"); the parser never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UiSnapshot {
    pub page: String,
    pub date_range: String,
    pub display_mode: String,
}

impl UiSnapshot {
    pub fn new(
        page: impl Into<String>,
        date_range: impl Into<String>,
        display_mode: impl Into<String>,
    ) -> Self {
        Self {
            page: page.into(),
            date_range: date_range.into(),
            display_mode: display_mode.into(),
        }
    }

    /// The snapshot's current value token for `domain`, if set.
    pub fn value_for(&self, domain: Domain) -> Option<&str> {
        let value = match domain {
            Domain::Navigation => self.page.as_str(),
            Domain::DateRange => self.date_range.as_str(),
            Domain::DisplayMode => self.display_mode.as_str(),
        };
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Outcome of dispatching one user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DispatchOutcome {
    /// At least one action was derived and handed to the channel.
    Published { count: usize },
    /// Nothing recognizable in the message; no side effects occurred.
    NoRecognizedAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_wire_names_are_camel_case() {
        assert_eq!(serde_json::to_string(&Domain::Navigation).unwrap(), "\"navigation\"");
        assert_eq!(serde_json::to_string(&Domain::DateRange).unwrap(), "\"dateRange\"");
        assert_eq!(serde_json::to_string(&Domain::DisplayMode).unwrap(), "\"displayMode\"");
    }

    #[test]
    fn snapshot_value_for_empty_is_none() {
        let snapshot = UiSnapshot::default();
        assert_eq!(snapshot.value_for(Domain::Navigation), None);

        let snapshot = UiSnapshot::new("dashboard", "today", "dollar");
        assert_eq!(snapshot.value_for(Domain::Navigation), Some("dashboard"));
        assert_eq!(snapshot.value_for(Domain::DateRange), Some("today"));
        assert_eq!(snapshot.value_for(Domain::DisplayMode), Some("dollar"));
    }
}
