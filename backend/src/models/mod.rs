//! Database models for the Skywatch weather tracker
//!
//! Re-exports models from the shared crate; row types live next to the
//! services that query them.

pub use shared::models::*;
