//! HTTP request handlers

pub mod alert;
pub mod auth;
pub mod dashboard;
pub mod forecast;
pub mod health;
pub mod location;
pub mod profile;
pub mod weather;

pub use alert::*;
pub use auth::*;
pub use dashboard::*;
pub use forecast::*;
pub use health::*;
pub use location::*;
pub use profile::*;
pub use weather::*;
