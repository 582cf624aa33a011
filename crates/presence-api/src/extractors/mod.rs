//! Axum extractors for request handling
//!
//! Every rejection is mapped onto [`crate::response::ApiError`] so clients
//! always receive the uniform error body.

mod path;
mod query;
mod validated;

pub use path::SessionIdPath;
pub use query::ApiQuery;
pub use validated::ValidatedJson;
