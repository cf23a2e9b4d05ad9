//! Intent extraction — turns free-form chat text into candidate commands.

pub mod parser;
pub mod rules;

pub use parser::parse;
pub use rules::{Pattern, Rule};
