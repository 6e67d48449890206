//! Filesystem primitives for the bundle repository indexer
//!
//! Provides path normalization for archive keys, whole-file atomic writes,
//! content digests and format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::WellKnown;
pub use error::{Error, Result};
pub use path::{ArchivePath, NormalizedPath};
