//! Pure session state transitions
//!
//! These functions decide what a login attempt or a stored session means
//! without touching storage or emitting notifications. The
//! [`SessionManager`](crate::session::SessionManager) applies their outcome.

use serde_json::Value;

use crate::error::CorruptSession;
use crate::models::{LoginCredentials, Role, Session};

/// Password accepted by the demo credential check.
///
/// This is a placeholder for a real credential check, not a security boundary.
pub const DEMO_PASSWORD: &str = "password";

/// Result of reading the persisted session
#[derive(Debug)]
pub enum RestoreOutcome {
    /// Nothing was persisted
    Absent,
    /// A valid session was found
    Restored(Session),
    /// The persisted value must be discarded
    Corrupt(CorruptSession),
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted(Session),
    Rejected,
}

/// Validate a raw persisted session
pub fn restore(raw: Option<&str>) -> RestoreOutcome {
    let Some(raw) = raw else {
        return RestoreOutcome::Absent;
    };

    match parse_session(raw) {
        Ok(session) => RestoreOutcome::Restored(session),
        Err(e) => RestoreOutcome::Corrupt(e),
    }
}

fn parse_session(raw: &str) -> Result<Session, CorruptSession> {
    let value: Value = serde_json::from_str(raw)?;

    match value.get("role") {
        Some(Value::String(role)) if Role::is_valid(role) => {}
        Some(Value::String(role)) => return Err(CorruptSession::InvalidRole(role.clone())),
        Some(other) => return Err(CorruptSession::InvalidRole(other.to_string())),
        None => return Err(CorruptSession::InvalidRole(String::new())),
    }

    Ok(serde_json::from_value(value)?)
}

/// Check credentials and synthesize the resulting session
pub fn authenticate(credentials: &LoginCredentials, issued_at_ms: u64) -> LoginOutcome {
    if credentials.password != DEMO_PASSWORD {
        return LoginOutcome::Rejected;
    }

    LoginOutcome::Accepted(Session::issue(
        &credentials.email,
        credentials.role,
        issued_at_ms,
    ))
}
