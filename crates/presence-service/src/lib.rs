//! # presence-service
//!
//! Application layer containing the registry service and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    RegistryService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
