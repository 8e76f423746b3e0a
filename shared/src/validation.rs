//! Validation utilities for the Skywatch weather tracker

use rust_decimal::Decimal;

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate username format (3-30 chars, lowercase alphanumeric plus
/// underscore and dot)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 30 {
        return Err("Username must be at most 30 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '.')
    {
        return Err("Username must be lowercase alphanumeric, underscore or dot");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate GPS coordinates are on the globe
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Forecast horizons the API accepts
pub fn validate_forecast_days(days: i64) -> Result<(), &'static str> {
    match days {
        3 | 5 | 7 => Ok(()),
        _ => Err("Invalid number of days. Choose 3, 5, or 7"),
    }
}

/// Threshold values must be finite numbers
pub fn validate_threshold_value(value: f64) -> Result<(), &'static str> {
    if value.is_finite() {
        Ok(())
    } else {
        Err("Threshold value must be a finite number")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("ada").is_ok());
        assert!(validate_username("grace_hopper").is_ok());
        assert!(validate_username("user.42").is_ok());
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username("Ada").is_err()); // Uppercase
        assert!(validate_username("a b").is_err()); // Space
        assert!(validate_username(&"x".repeat(31)).is_err()); // Too long
    }

    #[test]
    fn test_coordinates_bounds() {
        assert!(validate_coordinates(dec("51.5074"), dec("-0.1278")).is_ok());
        assert!(validate_coordinates(dec("-90"), dec("180")).is_ok());
        assert!(validate_coordinates(dec("90.1"), dec("0")).is_err());
        assert!(validate_coordinates(dec("0"), dec("-180.5")).is_err());
    }

    #[test]
    fn test_forecast_days() {
        assert!(validate_forecast_days(3).is_ok());
        assert!(validate_forecast_days(5).is_ok());
        assert!(validate_forecast_days(7).is_ok());
        assert!(validate_forecast_days(1).is_err());
        assert!(validate_forecast_days(10).is_err());
    }

    #[test]
    fn test_threshold_value() {
        assert!(validate_threshold_value(12.5).is_ok());
        assert!(validate_threshold_value(f64::NAN).is_err());
        assert!(validate_threshold_value(f64::INFINITY).is_err());
    }
}
