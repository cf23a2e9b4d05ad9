use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::Domain;

/// A raw, possibly-conflicting candidate extracted from user text.
///
/// Commands are produced by the intent parser and consumed by the command
/// generator. They are plain serializable data so a remote interpretation
/// service can ship them across a process boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub domain: Domain,
    /// Canonical value token, e.g. `statistics`, `all`, `r`.
    pub value: String,
    /// Match confidence in `[0, 1]`.
    pub confidence: f64,
    /// The substring of the normalized input that produced this command.
    pub source_span: String,
    /// Byte offset of the span in the normalized input. Drives the
    /// last-mentioned-intent tie-break.
    #[serde(default)]
    pub span_start: usize,
}

/// A dashboard page the user can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum NavigationTarget {
    Dashboard,
    Statistics,
    Trades,
    Calendar,
    Settings,
}

impl NavigationTarget {
    pub fn token(&self) -> &'static str {
        match self {
            NavigationTarget::Dashboard => "dashboard",
            NavigationTarget::Statistics => "statistics",
            NavigationTarget::Trades => "trades",
            NavigationTarget::Calendar => "calendar",
            NavigationTarget::Settings => "settings",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "dashboard" => Some(NavigationTarget::Dashboard),
            "statistics" => Some(NavigationTarget::Statistics),
            "trades" => Some(NavigationTarget::Trades),
            "calendar" => Some(NavigationTarget::Calendar),
            "settings" => Some(NavigationTarget::Settings),
            _ => None,
        }
    }
}

/// The date window the dashboard filters trades by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DateRange {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisYear,
    All,
}

impl DateRange {
    pub fn token(&self) -> &'static str {
        match self {
            DateRange::Today => "today",
            DateRange::Yesterday => "yesterday",
            DateRange::ThisWeek => "thisWeek",
            DateRange::LastWeek => "lastWeek",
            DateRange::ThisMonth => "thisMonth",
            DateRange::LastMonth => "lastMonth",
            DateRange::ThisYear => "thisYear",
            DateRange::All => "all",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "today" => Some(DateRange::Today),
            "yesterday" => Some(DateRange::Yesterday),
            "thisWeek" => Some(DateRange::ThisWeek),
            "lastWeek" => Some(DateRange::LastWeek),
            "thisMonth" => Some(DateRange::ThisMonth),
            "lastMonth" => Some(DateRange::LastMonth),
            "thisYear" => Some(DateRange::ThisYear),
            "all" => Some(DateRange::All),
            _ => None,
        }
    }
}

/// How trade results are rendered: R multiples, dollars, or percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    RMultiple,
    Dollar,
    Percent,
}

impl DisplayMode {
    pub fn token(&self) -> &'static str {
        match self {
            DisplayMode::RMultiple => "r",
            DisplayMode::Dollar => "dollar",
            DisplayMode::Percent => "percent",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "r" => Some(DisplayMode::RMultiple),
            "dollar" => Some(DisplayMode::Dollar),
            "percent" => Some(DisplayMode::Percent),
            _ => None,
        }
    }
}

/// The typed instruction carried by an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ActionPayload {
    Navigate(NavigationTarget),
    SetDateRange(DateRange),
    SetDisplayMode(DisplayMode),
}

impl ActionPayload {
    /// The domain this payload intrinsically belongs to.
    pub fn domain(&self) -> Domain {
        match self {
            ActionPayload::Navigate(_) => Domain::Navigation,
            ActionPayload::SetDateRange(_) => Domain::DateRange,
            ActionPayload::SetDisplayMode(_) => Domain::DisplayMode,
        }
    }

    /// The canonical value token carried by this payload.
    pub fn token(&self) -> &'static str {
        match self {
            ActionPayload::Navigate(target) => target.token(),
            ActionPayload::SetDateRange(range) => range.token(),
            ActionPayload::SetDisplayMode(mode) => mode.token(),
        }
    }
}

/// A canonicalized, deduplicated instruction derived from surviving commands.
///
/// Actions are immutable after creation and carry a unique id so consumers
/// can deduplicate at-least-once delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: Uuid,
    pub domain: Domain,
    pub payload: ActionPayload,
    pub created_at: DateTime<Utc>,
}

impl Action {
    /// Create a fresh action for `payload`; the domain is derived from the
    /// payload so the two can never disagree at construction time.
    pub fn new(payload: ActionPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: payload.domain(),
            payload,
            created_at: Utc::now(),
        }
    }

    /// True when the declared domain agrees with the payload's domain.
    /// Actions arriving over the wire may violate this.
    pub fn is_well_formed(&self) -> bool {
        self.domain == self.payload.domain()
    }
}
