//! Typed per-domain state holders with idempotent action application.

use std::fmt;
use std::sync::Arc;

use moka::sync::Cache;
use uuid::Uuid;

use crate::command::types::{Action, ActionPayload, DateRange, DisplayMode, NavigationTarget};
use crate::consumer::prefs::PreferenceStore;
use crate::error::{DispatchError, DispatchResult};
use crate::types::Domain;

/// Delivered action ids remembered per store for duplicate suppression.
/// Bounded so a long-lived store cannot grow without limit.
const SEEN_ID_CAPACITY: u64 = 256;

/// A value type bound to exactly one domain.
pub trait DomainValue: Sized + Clone + PartialEq + fmt::Debug + Send + 'static {
    const DOMAIN: Domain;

    fn from_payload(payload: &ActionPayload) -> Option<Self>;
    fn from_token(token: &str) -> Option<Self>;
    fn token(&self) -> &'static str;
    fn default_value() -> Self;
}

impl DomainValue for NavigationTarget {
    const DOMAIN: Domain = Domain::Navigation;

    fn from_payload(payload: &ActionPayload) -> Option<Self> {
        match payload {
            ActionPayload::Navigate(target) => Some(*target),
            _ => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        NavigationTarget::from_token(token)
    }

    fn token(&self) -> &'static str {
        NavigationTarget::token(self)
    }

    fn default_value() -> Self {
        NavigationTarget::Dashboard
    }
}

impl DomainValue for DateRange {
    const DOMAIN: Domain = Domain::DateRange;

    fn from_payload(payload: &ActionPayload) -> Option<Self> {
        match payload {
            ActionPayload::SetDateRange(range) => Some(*range),
            _ => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        DateRange::from_token(token)
    }

    fn token(&self) -> &'static str {
        DateRange::token(self)
    }

    fn default_value() -> Self {
        DateRange::ThisWeek
    }
}

impl DomainValue for DisplayMode {
    const DOMAIN: Domain = Domain::DisplayMode;

    fn from_payload(payload: &ActionPayload) -> Option<Self> {
        match payload {
            ActionPayload::SetDisplayMode(mode) => Some(*mode),
            _ => None,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        DisplayMode::from_token(token)
    }

    fn token(&self) -> &'static str {
        DisplayMode::token(self)
    }

    fn default_value() -> Self {
        DisplayMode::RMultiple
    }
}

/// State holder for one domain.
///
/// The initial value comes from the preference store when present, the
/// domain default otherwise; every applied action writes through. Applying
/// the same action id twice is a no-op so at-least-once delivery from the
/// channel never double-mutates.
pub struct ValueStore<V: DomainValue> {
    value: V,
    seen: Cache<Uuid, ()>,
    prefs: Arc<dyn PreferenceStore>,
}

impl<V: DomainValue> ValueStore<V> {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let value = prefs
            .load(V::DOMAIN)
            .and_then(|token| V::from_token(&token))
            .unwrap_or_else(V::default_value);
        Self {
            value,
            seen: Cache::new(SEEN_ID_CAPACITY),
            prefs,
        }
    }

    pub fn value(&self) -> V {
        self.value.clone()
    }

    pub fn token(&self) -> &'static str {
        self.value.token()
    }

    /// Apply one action to this store.
    ///
    /// Duplicate ids are ignored (`Ok`); an action whose payload belongs
    /// to another domain is rejected so the channel's error sink sees it.
    pub fn apply(&mut self, action: &Action) -> DispatchResult<()> {
        if self.seen.contains_key(&action.id) {
            tracing::debug!(id = %action.id, domain = %V::DOMAIN, "duplicate action ignored");
            return Ok(());
        }
        let value = V::from_payload(&action.payload).ok_or(DispatchError::DomainMismatch {
            expected: V::DOMAIN,
            got: action.payload.domain(),
        })?;
        self.seen.insert(action.id, ());
        self.value = value;
        self.prefs.save(V::DOMAIN, self.value.token());
        tracing::debug!(domain = %V::DOMAIN, value = self.value.token(), "store updated");
        Ok(())
    }
}
