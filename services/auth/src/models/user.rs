//! Login payload

use serde::{Deserialize, Serialize};

use super::Role;

/// User login credentials
///
/// The role is picked by the caller, typically from a role selector on the
/// login form. It is never derived from the email or password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl LoginCredentials {
    /// Create a new set of credentials
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}
