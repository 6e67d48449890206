//! The repository index document
//!
//! - [`xml`]: escaping and a span-aware tag tokenizer
//! - [`parser`]: [`ParsedIndex`], previous documents split into verbatim
//!   resource blocks keyed by content location
//! - [`writer`]: [`render_document`], the wrapper around those blocks

pub mod parser;
pub mod writer;
pub mod xml;

pub use parser::{ParsedIndex, ResourceRecord};
pub use writer::{REPOSITORY_XMLNS, render_document};
