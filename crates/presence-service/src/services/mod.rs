//! Business logic services
//!
//! This module contains the service layer that validates input and
//! orchestrates presence store operations.

pub mod context;
pub mod error;
pub mod registry;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use registry::RegistryService;
