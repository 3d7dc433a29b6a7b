//! Tether Core
//!
//! Core traits and types for tracked-file synchronization: entry identity,
//! the source capability contracts, and the modification-time comparison
//! that decides sync direction.

pub mod entry;
pub mod error;
pub mod source;

pub use entry::EntryId;
pub use error::{TetherError, TetherResult};
pub use source::{MtimeOrder, Source, UpdatableSource};
