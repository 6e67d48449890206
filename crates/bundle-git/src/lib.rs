//! Version-control status queries for the bundle repository indexer
//!
//! Reports which files in a working tree are untracked, newly added or
//! modified, so the indexer can limit re-extraction to those archives.

pub mod error;
pub mod status;

pub use error::{Error, Result};
pub use status::{FileChange, StatusProvider, WorkingTree};
