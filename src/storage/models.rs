//! Database models for Bistro Core.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{Admin, MenuItem};

/// Database row for the admins table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub created_at: String,
}

impl TryFrom<AdminRow> for Admin {
    type Error = crate::error::BistroError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        Ok(Admin {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| crate::error::BistroError::Internal(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

/// Database row for the menu_items table.
#[derive(Debug, Clone, FromRow)]
pub struct MenuItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub special: i64,
    pub created_at: String,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = crate::error::BistroError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        Ok(MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            image: row.image,
            special: row.special != 0,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| crate::error::BistroError::Internal(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}
