// globals.rs
//
// Global state for the unification layer: the event sequence counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Sequence counter for unified events (monotonically increasing)
pub static SEQUENCE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Get the next sequence ID for unified events
pub fn next_sequence_id() -> u64 {
    SEQUENCE_COUNTER.fetch_add(1, Ordering::SeqCst)
}
