//! Liveness policy

mod expiry;

pub use expiry::{is_active, is_stale, ExpiryPolicy};
