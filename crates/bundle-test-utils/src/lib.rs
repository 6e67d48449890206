//! Shared test utilities for the bundle-index workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] — git repository fixtures built with `git2`
//! - [`jar`] — real zip archives carrying a bundle manifest
//! - [`inventory`] — [`TestInventory`](inventory::TestInventory) builder for a
//!   repository root with a bundle inventory

pub mod git;
pub mod inventory;
pub mod jar;
