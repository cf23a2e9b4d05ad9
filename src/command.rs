//! Canonical commands and actions derived from parsed chat messages.

pub mod generator;
pub mod types;

pub use generator::generate;
pub use types::{Action, ActionPayload, Command, DateRange, DisplayMode, NavigationTarget};
