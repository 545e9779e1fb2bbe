//! Admin domain types.
//!
//! Administrators are the only authenticated principals in the system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An administrator account.
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Admin {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    /// Login name, unique across all admins.
    pub username: String,
    /// Contact email, optional.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Bcrypt digest of the password. Never the plaintext.
    #[serde(skip)]
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// The resolved identity attached to an authorized request.
///
/// Produced by the auth gate after token verification and store lookup;
/// handlers read it from request extensions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminIdentity {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Admin> for AdminIdentity {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let admin = Admin {
            id: 1,
            username: "admin".to_string(),
            email: Some("admin@example.com".to_string()),
            password_hash: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_identity_from_admin() {
        let admin = Admin {
            id: 7,
            username: "chef".to_string(),
            email: None,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };

        let identity = AdminIdentity::from(&admin);
        assert_eq!(identity.id, 7);
        assert_eq!(identity.username, "chef");
        assert!(identity.email.is_none());
    }
}
