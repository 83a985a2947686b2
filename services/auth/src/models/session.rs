//! Session model and related functionality

use serde::{Deserialize, Serialize};

use super::Role;

/// Session entity
///
/// The authenticated identity bound to the current dashboard instance. It
/// is persisted verbatim as JSON under the `hms_user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: String,
}

impl Session {
    /// Synthesize a session for a login issued at `issued_at_ms`
    pub fn issue(email: &str, role: Role, issued_at_ms: u64) -> Self {
        Self {
            id: session_id(role, issued_at_ms),
            name: display_name_from_email(email),
            email: email.to_string(),
            role,
            avatar: String::new(),
        }
    }

    /// Merge a profile update into this session
    ///
    /// Only the provided fields change. The id and role are fixed for the
    /// lifetime of the session.
    pub fn apply(mut self, update: ProfileUpdate) -> Self {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        self
    }
}

/// Profile update payload
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

/// Derive a display name from an email address
///
/// The local part is split on `.`, each segment gets an upper-case first
/// character, and the segments are joined with a space.
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split('.')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build a session id of the form `<role>-<base36 timestamp>`
pub fn session_id(role: Role, issued_at_ms: u64) -> String {
    format!("{}-{}", role, to_base36(issued_at_ms))
}

/// Lowercase base36 rendering without padding
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("john.doe@x.com"), "John Doe");
        assert_eq!(
            display_name_from_email("jane.smith@hospital.com"),
            "Jane Smith"
        );
        assert_eq!(display_name_from_email("admin@hospital.com"), "Admin");
        assert_eq!(display_name_from_email("mary.ann.lee@x.org"), "Mary Ann Lee");
    }

    #[test]
    fn test_display_name_keeps_rest_verbatim() {
        assert_eq!(display_name_from_email("mcDonald.o'neil@x.com"), "McDonald O'neil");
        assert_eq!(display_name_from_email("DR.WHO@x.com"), "DR WHO");
    }

    #[test]
    fn test_display_name_edge_cases() {
        // No @ uses the whole string
        assert_eq!(display_name_from_email("john.doe"), "John Doe");
        // Empty segments stay empty
        assert_eq!(display_name_from_email("a..b@x.com"), "A  B");
        assert_eq!(display_name_from_email("@x.com"), "");
        assert_eq!(display_name_from_email("élodie.durand@x.fr"), "Élodie Durand");
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1295), "zz");
        assert_eq!(to_base36(1296), "100");
        assert_eq!(to_base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn test_issue() {
        let session = Session::issue("john.doe@x.com", Role::Doctor, 1_700_000_000_000);
        assert_eq!(session.id, "doctor-loyw3v28");
        assert_eq!(session.name, "John Doe");
        assert_eq!(session.email, "john.doe@x.com");
        assert_eq!(session.role, Role::Doctor);
        assert!(session.avatar.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let session = Session::issue("jane.smith@hospital.com", Role::Patient, 36);
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "patient-10",
                "name": "Jane Smith",
                "email": "jane.smith@hospital.com",
                "role": "patient",
                "avatar": ""
            })
        );
    }

    #[test]
    fn test_avatar_defaults_when_missing() {
        let session: Session = serde_json::from_str(
            r#"{"id":"admin-1","name":"Admin","email":"admin@x.com","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(session.avatar, "");
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let session = Session::issue("john.doe@x.com", Role::Doctor, 1);
        let updated = session.clone().apply(ProfileUpdate {
            name: Some("Dr. John Doe".to_string()),
            avatar: Some("/avatars/jd.png".to_string()),
            ..Default::default()
        });

        assert_eq!(updated.id, session.id);
        assert_eq!(updated.role, session.role);
        assert_eq!(updated.email, session.email);
        assert_eq!(updated.name, "Dr. John Doe");
        assert_eq!(updated.avatar, "/avatars/jd.png");
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let session = Session::issue("a@b.c", Role::Admin, 5);
        assert_eq!(session.clone().apply(ProfileUpdate::default()), session);
    }
}
