//! Shared types and models for the vertical-lift operations platform
//!
//! This crate contains types shared between the workflow engine and the
//! consuming ERP/UI integrations.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
