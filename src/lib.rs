pub mod server;

pub mod config;
pub mod error;
pub mod types;

pub mod channel;
pub mod command;
pub mod consumer;
pub mod intent;
pub mod pipeline;

pub use crate::channel::{ActionChannel, ChannelConfig, SubscribeToken};
pub use crate::command::{Action, ActionPayload, Command};
pub use crate::error::{DispatchError, DispatchResult};
pub use crate::pipeline::{dispatch, interpret};
pub use crate::types::{DispatchOutcome, Domain, UiSnapshot};
