//! Menu item domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A dish on the restaurant menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    /// Unique identifier, assigned by the store.
    pub id: i64,
    /// Display name of the dish.
    pub name: String,
    /// Short description shown on the public page.
    pub description: String,
    /// Price in the restaurant's currency.
    pub price: f64,
    /// Menu section, e.g. "entradas", "pratos", "sobremesas".
    pub category: String,
    /// Stored filename of the uploaded image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Whether the dish is featured as a special.
    pub special: bool,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a menu item. The image is handled separately by the
/// upload flow and arrives here as an already-stored filename.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image: Option<String>,
    pub special: bool,
}

/// Partial update of a menu item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub special: Option<bool>,
}

impl MenuItemPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.special.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(MenuItemPatch::default().is_empty());

        let patch = MenuItemPatch {
            price: Some(12.5),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
