#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared data structures for the sql-compiler frontend.
//!
//! These types have no dependency on any particular pipeline stage; the
//! scanner, parser and semantic analyzer all build on top of them.
//!
//! - [`Position`] / [`LineIndex`]: byte-offset to 1-based line/column
//!   mapping, shared by every diagnostic in every stage.
//! - [`Interner`] / [`CaseInsensitiveInterner`]: string deduplication, used
//!   for identifiers (case-insensitive for table/column/alias names).

mod interner;
mod position;

#[cfg(test)]
mod interner_tests;

pub use interner::{CaseInsensitiveInterner, Interner, Symbol};
pub use position::{LineIndex, Position};
