//! Session ID - opaque client-supplied key of a presence record
//!
//! Rules:
//! - 1 to 128 characters
//! - ASCII alphanumerics plus `-`, `_`, `.` and `:`
//! - surrounding whitespace is rejected, never trimmed

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Validated session identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Maximum accepted length in characters
    pub const MAX_LEN: usize = 128;

    /// Parse and validate a session ID
    pub fn parse(value: impl Into<String>) -> Result<Self, SessionIdError> {
        let value = value.into();

        if value.is_empty() {
            return Err(SessionIdError::Empty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(SessionIdError::TooLong { max: Self::MAX_LEN });
        }
        if let Some(c) = value.chars().find(|c| !Self::is_allowed(*c)) {
            return Err(SessionIdError::InvalidCharacter(c));
        }

        Ok(Self(value))
    }

    #[inline]
    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
    }

    /// Borrow the raw identifier
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the raw identifier
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when parsing a session ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdError {
    #[error("session id must not be empty")]
    Empty,

    #[error("session id exceeds {max} characters")]
    TooLong { max: usize },

    #[error("session id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by SessionId be queried with a plain &str
impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
