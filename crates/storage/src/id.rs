//! Identifier allocation.
//!
//! Each entity kind allocates from its own sequence, so user ids and film
//! ids are independent. Ids are strictly increasing and never reused, and
//! allocation is a single atomic fetch-add so concurrent callers can never
//! observe a duplicate.

use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out strictly increasing ids starting at 1.
#[derive(Debug, Default)]
pub struct IdSequence(AtomicU32);

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id. Never returns the same value twice.
    pub fn next(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}
