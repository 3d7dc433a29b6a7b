//! Tether Engine
//!
//! Project configuration, persisted tracking state, ignore-hint
//! regeneration, and the synchronization driver that decides pull/push
//! direction per tracked entry.

pub mod config;
pub mod driver;
pub mod ignore;
pub mod state;

pub use config::Config;
pub use driver::{ConfirmOverwrite, SyncAction, SyncEngine, SyncReport};
pub use state::{TrackFile, TrackedEntry};
