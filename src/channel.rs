//! The action channel: pub/sub delivery with buffering for consumers that
//! have not mounted yet.

pub mod pending;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::command::types::Action;
use crate::error::DispatchError;
use crate::types::Domain;
use pending::PendingQueue;

/// Callback a consumer registers for its domain. An `Err` is treated as a
/// consumer crash: recorded and reported, never propagated to the caller
/// of `publish`.
pub type ApplyFn = Box<dyn FnMut(&Action) -> Result<(), DispatchError> + Send>;

/// Tunables for an [`ActionChannel`].
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// How long a buffered action stays deliverable. Entries older than
    /// this are dropped unapplied when a consumer finally registers, so a
    /// slow page transition never replays a command meant for a previous
    /// page.
    pub retention: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { retention: Duration::from_secs(5) }
    }
}

/// Handle returned by [`ActionChannel::subscribe`]; passing it back to
/// [`ActionChannel::unsubscribe`] tears the registration down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscribeToken {
    domain: Domain,
    id: Uuid,
}

impl SubscribeToken {
    pub fn domain(&self) -> Domain {
        self.domain
    }
}

/// Counters for locally-recovered faults. The channel never surfaces these
/// as errors; they exist for observability and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Buffered actions discarded for outliving the retention window.
    pub stale_dropped: u64,
    /// Actions dropped because the declared domain disagreed with the
    /// payload.
    pub malformed_dropped: u64,
    /// Consumer callbacks that returned an error.
    pub apply_failures: u64,
    /// Buffered actions successfully replayed to a late registration.
    pub replayed: u64,
}

struct Registration {
    id: Uuid,
    apply: ApplyFn,
    registered_at: Instant,
}

/// Process-wide dispatch point between action producers and the state
/// holders currently mounted.
///
/// Explicitly constructed and passed by reference; there is no ambient
/// global. All methods are synchronous and take `&mut self`, matching the
/// single-threaded cooperative model: publish and subscribe can never
/// interleave mid-operation.
///
/// Per-domain state machine: with no consumer registered, published
/// actions buffer in the pending queue; `subscribe` replays the buffer in
/// publish order (minus stale entries) and clears it; `unsubscribe`
/// reverts the domain to buffering.
pub struct ActionChannel {
    config: ChannelConfig,
    consumers: HashMap<Domain, Registration>,
    pending: PendingQueue,
    stats: ChannelStats,
}

impl ActionChannel {
    pub fn new() -> Self {
        Self::with_config(ChannelConfig::default())
    }

    pub fn with_config(config: ChannelConfig) -> Self {
        Self {
            config,
            consumers: HashMap::new(),
            pending: PendingQueue::new(),
            stats: ChannelStats::default(),
        }
    }

    /// Deliver `actions` to currently-registered consumers, buffering for
    /// domains with no consumer. Never errors: malformed actions are
    /// dropped and counted, and a failing consumer does not block
    /// delivery to other domains.
    pub fn publish(&mut self, actions: Vec<Action>) {
        for action in actions {
            if !action.is_well_formed() {
                tracing::warn!(
                    id = %action.id,
                    declared = %action.domain,
                    actual = %action.payload.domain(),
                    "malformed action dropped: declared domain disagrees with payload"
                );
                self.stats.malformed_dropped += 1;
                continue;
            }
            let domain = action.domain;
            match self.consumers.get_mut(&domain) {
                Some(registration) => {
                    if let Err(error) = (registration.apply)(&action) {
                        tracing::warn!(id = %action.id, %domain, %error, "consumer failed to apply action");
                        self.stats.apply_failures += 1;
                    }
                }
                None => {
                    let swept = self.pending.sweep(domain, self.config.retention);
                    self.stats.stale_dropped += swept as u64;
                    tracing::debug!(id = %action.id, %domain, "no consumer mounted, action buffered");
                    self.pending.push(action);
                }
            }
        }
    }

    /// Register the active consumer for `domain` and replay any buffered
    /// actions in original publish order. A prior registration for the
    /// same domain is replaced; at most one consumer is active per domain.
    pub fn subscribe(&mut self, domain: Domain, mut apply: ApplyFn) -> SubscribeToken {
        if self.consumers.contains_key(&domain) {
            tracing::warn!(%domain, "replacing existing consumer registration");
        }

        for entry in self.pending.drain(domain) {
            if entry.buffered_at.elapsed() > self.config.retention {
                tracing::debug!(
                    id = %entry.action.id,
                    %domain,
                    "stale buffered action dropped at replay"
                );
                self.stats.stale_dropped += 1;
                continue;
            }
            match apply(&entry.action) {
                Ok(()) => self.stats.replayed += 1,
                Err(error) => {
                    tracing::warn!(id = %entry.action.id, %domain, %error, "consumer failed during replay");
                    self.stats.apply_failures += 1;
                }
            }
        }

        let token = SubscribeToken { domain, id: Uuid::new_v4() };
        self.consumers.insert(
            domain,
            Registration { id: token.id, apply, registered_at: Instant::now() },
        );
        tracing::debug!(%domain, "consumer registered");
        token
    }

    /// Tear down the registration identified by `token`. A token that was
    /// already replaced or removed is ignored, so teardown racing a
    /// remount never unregisters the newer consumer.
    pub fn unsubscribe(&mut self, token: SubscribeToken) {
        if let Some(registration) = self.consumers.get(&token.domain) {
            if registration.id == token.id {
                let lived = registration.registered_at.elapsed();
                self.consumers.remove(&token.domain);
                tracing::debug!(domain = %token.domain, ?lived, "consumer unregistered");
            }
        }
    }

    /// Whether a consumer is currently registered for `domain`.
    pub fn has_consumer(&self, domain: Domain) -> bool {
        self.consumers.contains_key(&domain)
    }

    /// Number of buffered actions for `domain`.
    pub fn pending_len(&self, domain: Domain) -> usize {
        self.pending.len(domain)
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }
}

impl Default for ActionChannel {
    fn default() -> Self {
        Self::new()
    }
}
