//! Shared types and models for the Skywatch weather tracker
//!
//! This crate contains types shared between the backend server, its
//! background jobs, and the integration test suites.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
