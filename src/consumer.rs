//! Consumer adapters: per-domain state holders that apply actions and
//! announce readiness to the channel on mount.

pub mod adapters;
pub mod prefs;
pub mod store;

pub use adapters::{attach, DateRangeStore, DisplayModeStore, NavigationStore};
pub use prefs::{JsonFilePrefs, MemoryPrefs, PreferenceStore};
pub use store::{DomainValue, ValueStore};
