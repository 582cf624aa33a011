//! Domain entities - core business objects

mod presence_record;

pub use presence_record::{metadata_keys, Metadata, PresenceRecord};
