//! Ports - interfaces the domain layer needs from the outside world

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use store::{PresenceStore, SharedPresenceStore};
