//! # presence-store
//!
//! Storage layer for presence records.
//!
//! ## Features
//!
//! - **In-memory store**: a lock-guarded map implementing [`PresenceStore`]
//!
//! Records live only as long as the process. Nothing is persisted.
//!
//! ## Example
//!
//! ```ignore
//! use presence_store::InMemoryPresenceStore;
//!
//! let store = InMemoryPresenceStore::new_shared();
//! store.upsert(record);
//! let snapshot = store.all();
//! ```
//!
//! [`PresenceStore`]: presence_core::PresenceStore

pub mod memory;

pub use memory::InMemoryPresenceStore;
