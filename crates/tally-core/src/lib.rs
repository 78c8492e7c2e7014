//! Core types and scoring rules for the Tally habit tracker.
//!
//! Everything that decides points, completion state and statistics lives
//! here as plain functions over tasks and records. Storage is reached only
//! through the [`store::RecordStore`] trait; this crate has no HTTP or
//! database dependencies.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod buff;
pub mod completion;
pub mod error;
pub mod memory;
pub mod period;
pub mod record;
pub mod service;
pub mod stats;
pub mod store;
pub mod streak;
pub mod task;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use period::Calendar;
pub use service::TallyService;
