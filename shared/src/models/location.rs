//! Location models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked place with GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// A location candidate returned by the upstream search API,
/// not yet saved anywhere
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationCandidate {
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}
