//! The mount handshake between stores and the channel.

use std::sync::{Arc, Mutex};

use crate::channel::{ActionChannel, SubscribeToken};
use crate::command::types::{DateRange, DisplayMode, NavigationTarget};
use crate::consumer::store::{DomainValue, ValueStore};
use crate::error::DispatchError;

pub type NavigationStore = ValueStore<NavigationTarget>;
pub type DateRangeStore = ValueStore<DateRange>;
pub type DisplayModeStore = ValueStore<DisplayMode>;

/// Register `store` as the active consumer for its domain.
///
/// This is the readiness handshake: called exactly once when the state
/// holder mounts, and the returned token is passed to
/// [`ActionChannel::unsubscribe`] on teardown. Any actions the channel
/// buffered for the domain are applied before this returns.
pub fn attach<V: DomainValue>(
    channel: &mut ActionChannel,
    store: Arc<Mutex<ValueStore<V>>>,
) -> SubscribeToken {
    channel.subscribe(
        V::DOMAIN,
        Box::new(move |action| {
            let mut guard = store
                .lock()
                .map_err(|_| DispatchError::Internal("store lock poisoned".to_string()))?;
            guard.apply(action)
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::types::{Action, ActionPayload};
    use crate::consumer::prefs::MemoryPrefs;
    use crate::types::Domain;

    fn shared<V: DomainValue>() -> Arc<Mutex<ValueStore<V>>> {
        Arc::new(Mutex::new(ValueStore::new(Arc::new(MemoryPrefs::new()))))
    }

    #[test]
    fn attach_applies_buffered_actions_before_returning() {
        let mut channel = ActionChannel::new();
        channel.publish(vec![Action::new(ActionPayload::SetDateRange(DateRange::LastWeek))]);

        let store = shared::<DateRange>();
        attach(&mut channel, store.clone());

        assert_eq!(store.lock().unwrap().value(), DateRange::LastWeek);
        assert_eq!(channel.pending_len(Domain::DateRange), 0);
    }

    #[test]
    fn attach_then_publish_applies_live() {
        let mut channel = ActionChannel::new();
        let store = shared::<NavigationTarget>();
        attach(&mut channel, store.clone());

        channel.publish(vec![Action::new(ActionPayload::Navigate(NavigationTarget::Calendar))]);
        assert_eq!(store.lock().unwrap().value(), NavigationTarget::Calendar);
    }

    #[test]
    fn detach_stops_delivery() {
        let mut channel = ActionChannel::new();
        let store = shared::<DisplayMode>();
        let token = attach(&mut channel, store.clone());
        channel.unsubscribe(token);

        channel.publish(vec![Action::new(ActionPayload::SetDisplayMode(DisplayMode::Percent))]);
        assert_eq!(store.lock().unwrap().value(), DisplayMode::RMultiple);
        assert_eq!(channel.pending_len(Domain::DisplayMode), 1);
    }

    #[test]
    fn one_component_can_attach_multiple_domains() {
        // A dashboard page holding both stores makes one domain-scoped
        // subscribe call per store.
        let mut channel = ActionChannel::new();
        let nav = shared::<NavigationTarget>();
        let range = shared::<DateRange>();
        let nav_token = attach(&mut channel, nav.clone());
        let range_token = attach(&mut channel, range.clone());
        assert_ne!(nav_token.domain(), range_token.domain());

        channel.publish(vec![
            Action::new(ActionPayload::Navigate(NavigationTarget::Trades)),
            Action::new(ActionPayload::SetDateRange(DateRange::ThisYear)),
        ]);
        assert_eq!(nav.lock().unwrap().value(), NavigationTarget::Trades);
        assert_eq!(range.lock().unwrap().value(), DateRange::ThisYear);
    }
}
