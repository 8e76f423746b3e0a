//! Location management tests
//!
//! Coordinate validation and saved-location semantics.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::LocationCandidate;
use shared::validation::validate_coordinates;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Any point on the globe validates
    #[test]
    fn test_globe_coordinates_valid(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
        let lat = Decimal::from_f64_retain(lat).unwrap().round_dp(6);
        let lon = Decimal::from_f64_retain(lon).unwrap().round_dp(6);
        prop_assert!(validate_coordinates(lat, lon).is_ok());
    }

    /// Latitudes beyond the poles never validate
    #[test]
    fn test_out_of_range_latitude_rejected(lat in 90.001f64..1000.0) {
        let lat = Decimal::from_f64_retain(lat).unwrap().round_dp(6);
        prop_assert!(validate_coordinates(lat, Decimal::ZERO).is_err());
        prop_assert!(validate_coordinates(-lat, Decimal::ZERO).is_err());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_known_city_coordinates() {
    // London, Reykjavik, Wellington
    for (lat, lon) in [
        ("51.5074", "-0.1278"),
        ("64.1466", "-21.9426"),
        ("-41.2866", "174.7756"),
    ] {
        assert!(validate_coordinates(dec(lat), dec(lon)).is_ok());
    }
}

#[test]
fn test_out_of_range_longitude_rejected() {
    assert!(validate_coordinates(dec("0"), dec("180.5")).is_err());
    assert!(validate_coordinates(dec("0"), dec("-200")).is_err());
}

#[test]
fn test_search_candidate_round_trips_through_json() {
    let candidate = LocationCandidate {
        name: "London, United Kingdom".to_string(),
        latitude: dec("51.52"),
        longitude: dec("-0.11"),
    };

    let json = serde_json::to_string(&candidate).unwrap();
    let back: LocationCandidate = serde_json::from_str(&json).unwrap();
    assert_eq!(back, candidate);
    // Candidates are not saved yet, so they carry no id field
    assert!(!json.contains("\"id\""));
}
