//! Staff user models.

use serde::{Deserialize, Serialize};

/// Staff role. Decides which front-office actions an account may perform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Receptionist,
}

impl Role {
    /// Canonical lowercase name, as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Receptionist => "receptionist",
        }
    }

    /// Parse the canonical lowercase name.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "doctor" => Some(Role::Doctor),
            "receptionist" => Some(Role::Receptionist),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff profile. The `uid` is the account id assigned by the credential
/// vault at registration, so profiles and credentials stay joined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Vault account id
    pub uid: String,
    /// Display name
    pub name: String,
    /// Sign-in email (normalized lowercase)
    pub email: String,
    /// Staff role
    pub role: Role,
    /// Creation timestamp
    pub created_at: String,
}

impl User {
    /// Create a profile for a freshly registered account.
    pub fn new(uid: String, name: String, email: String, role: Role) -> Self {
        Self {
            uid,
            name,
            email,
            role,
            created_at: super::now_ts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::parse("doctor"), Some(Role::Doctor));
        assert_eq!(Role::parse("receptionist"), Some(Role::Receptionist));
        assert_eq!(Role::parse("janitor"), None);
        assert_eq!(Role::Doctor.as_str(), "doctor");
    }

    #[test]
    fn test_new_user() {
        let user = User::new(
            "uid-1".into(),
            "Dr. Ayesha Khan".into(),
            "ayesha@clinic.example".into(),
            Role::Doctor,
        );
        assert_eq!(user.role, Role::Doctor);
        assert!(!user.created_at.is_empty());
    }
}
