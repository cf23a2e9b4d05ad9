//! End-to-end flow: user text in, actions published to the channel.

use crate::channel::ActionChannel;
use crate::command::generate;
use crate::command::types::Action;
use crate::intent::parse;
use crate::types::{DispatchOutcome, UiSnapshot};

/// Interpret `text` into canonical actions without publishing anything.
///
/// Pure: suitable for a remote interpretation service that ships the
/// resulting actions to a channel in another process.
pub fn interpret(text: &str, snapshot: &UiSnapshot) -> Vec<Action> {
    let commands = parse(text, snapshot);
    generate(&commands)
}

/// Interpret `text` and hand the resulting actions to `channel`.
///
/// When nothing is recognized the channel is untouched and the caller
/// gets [`DispatchOutcome::NoRecognizedAction`] to surface as a neutral
/// "no recognized action" reply, never as an error.
pub fn dispatch(channel: &mut ActionChannel, text: &str, snapshot: &UiSnapshot) -> DispatchOutcome {
    let actions = interpret(text, snapshot);
    if actions.is_empty() {
        tracing::debug!(text, "no command extracted from message");
        return DispatchOutcome::NoRecognizedAction;
    }
    let count = actions.len();
    tracing::info!(count, "publishing actions derived from message");
    channel.publish(actions);
    DispatchOutcome::Published { count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::types::{ActionPayload, DisplayMode};
    use crate::types::Domain;

    fn snapshot() -> UiSnapshot {
        UiSnapshot::new("dashboard", "thisWeek", "dollar")
    }

    #[test]
    fn interpret_covers_all_three_domains() {
        let actions = interpret("show stats all time in R", &snapshot());
        let domains: Vec<Domain> = actions.iter().map(|a| a.domain).collect();
        assert_eq!(domains, vec![Domain::Navigation, Domain::DateRange, Domain::DisplayMode]);
    }

    #[test]
    fn dispatch_publishes_into_channel() {
        let mut channel = ActionChannel::new();
        let outcome = dispatch(&mut channel, "switch to percent", &snapshot());
        assert_eq!(outcome, DispatchOutcome::Published { count: 1 });
        assert_eq!(channel.pending_len(Domain::DisplayMode), 1);
    }

    #[test]
    fn unrecognized_message_touches_nothing() {
        let mut channel = ActionChannel::new();
        let outcome = dispatch(&mut channel, "hello, how are you?", &snapshot());
        assert_eq!(outcome, DispatchOutcome::NoRecognizedAction);
        for domain in Domain::ALL {
            assert_eq!(channel.pending_len(domain), 0);
        }
    }

    #[test]
    fn interpret_is_pure() {
        let first = interpret("in dollars", &snapshot());
        let second = interpret("in dollars", &snapshot());
        // Fresh ids each call, same payloads.
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(first[0].payload, ActionPayload::SetDisplayMode(DisplayMode::Dollar));
        assert_eq!(first[0].payload, second[0].payload);
    }
}
