//! # presence-core
//!
//! Domain layer containing the presence record entity, value objects, the
//! expiry policy, and the store/clock traits.
//! This crate has zero dependencies on infrastructure (storage, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{metadata_keys, Metadata, PresenceRecord};
pub use error::DomainError;
pub use policy::{is_active, is_stale, ExpiryPolicy};
pub use traits::{Clock, ManualClock, PresenceStore, SharedClock, SharedPresenceStore, SystemClock};
pub use value_objects::{
    BrowserFamily, ClientHints, DeviceClass, OsFamily, SessionId, SessionIdError,
};
