//! Domain models for the Skywatch weather tracker

mod alert;
mod forecast;
mod location;
mod user;
mod weather;

pub use alert::*;
pub use forecast::*;
pub use location::*;
pub use user::*;
pub use weather::*;
