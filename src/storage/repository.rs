//! Repository layer for database operations.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::domain::{Admin, MenuItem, MenuItemPatch, NewMenuItem};
use crate::error::{BistroError, BistroResult};
use crate::storage::models::{AdminRow, MenuItemRow};

/// Repository for all Bistro database operations.
///
/// Owns the connection pool; each call acquires a connection from the
/// pool and releases it on every exit path.
#[derive(Clone)]
pub struct BistroRepository {
    pool: SqlitePool,
}

impl BistroRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> BistroResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admins (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_admins_username ON admins(username);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                image TEXT,
                special INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_menu_items_category ON menu_items(category);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== Admins ====================

    /// Find an admin by username.
    pub async fn find_admin_by_username(&self, username: &str) -> BistroResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, email, password_hash, created_at FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    /// Find an admin by id.
    pub async fn find_admin_by_id(&self, id: i64) -> BistroResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, email, password_hash, created_at FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Admin::try_from).transpose()
    }

    /// Insert a new admin.
    ///
    /// A username collision maps to `DuplicateUsername` and leaves the
    /// store unchanged; the UNIQUE constraint serializes concurrent
    /// inserts of the same name.
    pub async fn insert_admin(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> BistroResult<Admin> {
        let result = sqlx::query(
            "INSERT INTO admins (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, username))?;

        self.find_admin_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| BistroError::Internal("Inserted admin not found".to_string()))
    }

    /// Update an admin's username, email, and password hash.
    pub async fn update_admin(
        &self,
        id: i64,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> BistroResult<Admin> {
        let result =
            sqlx::query("UPDATE admins SET username = ?, email = ?, password_hash = ? WHERE id = ?")
                .bind(username)
                .bind(email)
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, username))?;

        if result.rows_affected() == 0 {
            return Err(BistroError::NotFound(format!("Admin {}", id)));
        }

        self.find_admin_by_id(id)
            .await?
            .ok_or_else(|| BistroError::Internal("Updated admin not found".to_string()))
    }

    /// Seed the bootstrap admin if it does not exist yet.
    ///
    /// Returns true if an admin was created. Idempotent across restarts;
    /// a concurrent creation losing the race is treated as already
    /// present.
    pub async fn bootstrap_admin(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> BistroResult<bool> {
        if self.find_admin_by_username(username).await?.is_some() {
            return Ok(false);
        }

        match self.insert_admin(username, email, password_hash).await {
            Ok(_) => Ok(true),
            Err(BistroError::DuplicateUsername(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    // ==================== Menu Items ====================

    /// List all menu items.
    pub async fn list_menu_items(&self) -> BistroResult<Vec<MenuItem>> {
        let rows = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, name, description, price, category, image, special, created_at
            FROM menu_items
            ORDER BY category, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MenuItem::try_from).collect()
    }

    /// Get a menu item by id.
    pub async fn get_menu_item(&self, id: i64) -> BistroResult<Option<MenuItem>> {
        let row = sqlx::query_as::<_, MenuItemRow>(
            r#"
            SELECT id, name, description, price, category, image, special, created_at
            FROM menu_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MenuItem::try_from).transpose()
    }

    /// Insert a new menu item.
    pub async fn insert_menu_item(&self, item: &NewMenuItem) -> BistroResult<MenuItem> {
        let result = sqlx::query(
            r#"
            INSERT INTO menu_items (name, description, price, category, image, special, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.category)
        .bind(&item.image)
        .bind(item.special as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.get_menu_item(result.last_insert_rowid())
            .await?
            .ok_or_else(|| BistroError::Internal("Inserted menu item not found".to_string()))
    }

    /// Apply a partial update to a menu item.
    ///
    /// Unset fields keep their current values. Returns the updated item,
    /// or `NotFound` if the id does not exist.
    pub async fn update_menu_item(&self, id: i64, patch: &MenuItemPatch) -> BistroResult<MenuItem> {
        let current = self
            .get_menu_item(id)
            .await?
            .ok_or_else(|| BistroError::NotFound(format!("Menu item {}", id)))?;

        let name = patch.name.as_deref().unwrap_or(&current.name);
        let description = patch
            .description
            .as_deref()
            .unwrap_or(&current.description);
        let price = patch.price.unwrap_or(current.price);
        let category = patch.category.as_deref().unwrap_or(&current.category);
        let image = patch.image.as_deref().or(current.image.as_deref());
        let special = patch.special.unwrap_or(current.special);

        sqlx::query(
            r#"
            UPDATE menu_items
            SET name = ?, description = ?, price = ?, category = ?, image = ?, special = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category)
        .bind(image)
        .bind(special as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_menu_item(id)
            .await?
            .ok_or_else(|| BistroError::Internal("Updated menu item not found".to_string()))
    }

    /// Delete a menu item, returning the deleted row so the caller can
    /// remove its image file.
    pub async fn delete_menu_item(&self, id: i64) -> BistroResult<MenuItem> {
        let item = self
            .get_menu_item(id)
            .await?
            .ok_or_else(|| BistroError::NotFound(format!("Menu item {}", id)))?;

        sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(item)
    }
}

/// Map a UNIQUE constraint violation to `DuplicateUsername`.
fn map_unique_violation(e: sqlx::Error, username: &str) -> BistroError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            BistroError::DuplicateUsername(username.to_string())
        }
        _ => BistroError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_repository() -> BistroRepository {
        // Single connection so the in-memory database is shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repository = BistroRepository::new(pool);
        repository.init_schema().await.unwrap();
        repository
    }

    fn new_item(name: &str) -> NewMenuItem {
        NewMenuItem {
            name: name.to_string(),
            description: "A test dish".to_string(),
            price: 9.5,
            category: "pratos".to_string(),
            image: None,
            special: false,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_admin() {
        let repo = test_repository().await;

        let admin = repo
            .insert_admin("admin", Some("admin@example.com"), "hash")
            .await
            .unwrap();
        assert!(admin.id > 0);

        let found = repo.find_admin_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.email.as_deref(), Some("admin@example.com"));

        assert!(repo.find_admin_by_username("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = test_repository().await;

        repo.insert_admin("admin", None, "hash-1").await.unwrap();

        let err = repo.insert_admin("admin", None, "hash-2").await.unwrap_err();
        assert!(matches!(err, BistroError::DuplicateUsername(ref n) if n == "admin"));

        // Store unchanged: original hash still in place.
        let admin = repo.find_admin_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.password_hash, "hash-1");
    }

    #[tokio::test]
    async fn test_update_admin() {
        let repo = test_repository().await;

        let admin = repo.insert_admin("admin", None, "hash").await.unwrap();

        let updated = repo
            .update_admin(admin.id, "chef", Some("chef@example.com"), "new-hash")
            .await
            .unwrap();
        assert_eq!(updated.username, "chef");
        assert_eq!(updated.password_hash, "new-hash");

        assert!(matches!(
            repo.update_admin(999, "nobody", None, "hash").await,
            Err(BistroError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_admin_colliding_rename() {
        let repo = test_repository().await;

        repo.insert_admin("admin", None, "hash").await.unwrap();
        let other = repo.insert_admin("chef", None, "hash").await.unwrap();

        assert!(matches!(
            repo.update_admin(other.id, "admin", None, "hash").await,
            Err(BistroError::DuplicateUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let repo = test_repository().await;

        assert!(repo
            .bootstrap_admin("admin", Some("admin@example.com"), "hash")
            .await
            .unwrap());
        assert!(!repo
            .bootstrap_admin("admin", Some("admin@example.com"), "other-hash")
            .await
            .unwrap());

        // First write wins.
        let admin = repo.find_admin_by_username("admin").await.unwrap().unwrap();
        assert_eq!(admin.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_menu_item_crud() {
        let repo = test_repository().await;

        assert!(repo.list_menu_items().await.unwrap().is_empty());

        let item = repo.insert_menu_item(&new_item("Feijoada")).await.unwrap();
        assert_eq!(item.name, "Feijoada");
        assert!(!item.special);

        let patch = MenuItemPatch {
            price: Some(14.0),
            special: Some(true),
            ..Default::default()
        };
        let updated = repo.update_menu_item(item.id, &patch).await.unwrap();
        assert_eq!(updated.price, 14.0);
        assert!(updated.special);
        // Untouched fields survive a partial update.
        assert_eq!(updated.name, "Feijoada");
        assert_eq!(updated.description, "A test dish");

        let deleted = repo.delete_menu_item(item.id).await.unwrap();
        assert_eq!(deleted.id, item.id);
        assert!(repo.list_menu_items().await.unwrap().is_empty());

        assert!(matches!(
            repo.delete_menu_item(item.id).await,
            Err(BistroError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_menu_item() {
        let repo = test_repository().await;

        assert!(matches!(
            repo.update_menu_item(1, &MenuItemPatch::default()).await,
            Err(BistroError::NotFound(_))
        ));
    }
}
