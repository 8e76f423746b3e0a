//! User profile models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub initials: String,
}

/// First letter of first and last name, uppercased. Falls back to "NN"
/// when either name is empty.
pub fn initials(first_name: &str, last_name: &str) -> String {
    match (first_name.chars().next(), last_name.chars().next()) {
        (Some(f), Some(l)) => format!(
            "{}{}",
            f.to_uppercase().collect::<String>(),
            l.to_uppercase().collect::<String>()
        ),
        _ => "NN".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_from_names() {
        assert_eq!(initials("ada", "lovelace"), "AL");
        assert_eq!(initials("Grace", "Hopper"), "GH");
    }

    #[test]
    fn test_initials_fallback() {
        assert_eq!(initials("", "Hopper"), "NN");
        assert_eq!(initials("Grace", ""), "NN");
        assert_eq!(initials("", ""), "NN");
    }
}
