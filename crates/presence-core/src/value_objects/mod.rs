//! Value objects - immutable types that represent domain concepts

mod client_hints;
mod session_id;

pub use client_hints::{BrowserFamily, ClientHints, DeviceClass, OsFamily};
pub use session_id::{SessionId, SessionIdError};
