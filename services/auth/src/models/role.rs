//! Role model and related functionality

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Dashboard role bound to a session
///
/// The role is chosen by the caller at login time and gates which views
/// and actions are available. It never changes for the lifetime of a
/// session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Every valid role
    pub const ALL: [Role; 3] = [Role::Patient, Role::Doctor, Role::Admin];

    /// Lowercase name as persisted
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Whether the given persisted name is a valid role
    pub fn is_valid(name: &str) -> bool {
        Self::ALL.iter().any(|role| role.as_str() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_matches_persisted_name() {
        for role in Role::iter() {
            assert_eq!(role.to_string(), role.as_str());
        }
        assert_eq!(Role::Patient.as_str(), "patient");
        assert_eq!(Role::Doctor.as_str(), "doctor");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Role::from_str("doctor").unwrap(), Role::Doctor);
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert!(Role::from_str("superadmin").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Patient).unwrap(), "\"patient\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"admin\"").unwrap(),
            Role::Admin
        );
        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
    }

    #[test]
    fn test_is_valid_is_exact() {
        assert!(Role::is_valid("patient"));
        assert!(!Role::is_valid("Patient"));
        assert!(!Role::is_valid("superadmin"));
    }
}
