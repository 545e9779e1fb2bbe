//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Admin, AdminIdentity, MenuItem};
use crate::uploads::ImageStore;

// ==================== Authentication ====================

/// Login form body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub access_token: String,
    /// Always "bearer".
    pub token_type: String,
}

// ==================== Admins ====================

/// Form body for creating or updating an admin.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminForm {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

/// Admin account as exposed to API clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<&Admin> for AdminResponse {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
            email: admin.email.clone(),
        }
    }
}

impl From<AdminIdentity> for AdminResponse {
    fn from(identity: AdminIdentity) -> Self {
        Self {
            id: identity.id,
            username: identity.username,
            email: identity.email,
        }
    }
}

// ==================== Menu ====================

/// Menu item as exposed to API clients. The stored image filename is
/// translated into its public URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub special: bool,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            image: item.image.as_deref().map(ImageStore::url_for),
            special: item.special,
        }
    }
}

/// Confirmation message for delete operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}
