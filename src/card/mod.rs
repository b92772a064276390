//! Frontend half: the issue card's data side.
//!
//! - Snapshots of a project's issues live in a local key-value store for
//!   three hours (`snapshot`, `store`)
//! - `loader` answers from a fresh snapshot or goes through the proxy route
//! - `filters` derives the per-field vocabularies and the filtered view
//! - `state` is the card's lifecycle, `ticker` keeps the age label current

pub mod filters;
pub mod loader;
pub mod relative_time;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod store;
pub mod ticker;
