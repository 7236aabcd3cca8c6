//! Services offered on the site
//!
//! Provides CRUD operations for the service catalogue shown on the
//! landing page and referenced by contact messages.

use crate::storage::Database;
use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// A service entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// CSS class reference for the display icon (e.g. "fas fa-code")
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl Service {
    /// Create a new active service
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            display_order: 0,
            is_active: true,
        }
    }

    /// Set the display order
    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = order;
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

/// Service repository for database operations
pub struct ServiceRepository<'a> {
    db: &'a Database,
}

impl<'a> ServiceRepository<'a> {
    /// Create a new service repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new service in the database
    pub async fn create(&self, service: &Service) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO services (id, title, description, icon, display_order, is_active)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&service.id)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(service.display_order)
        .bind(service.is_active)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a service by ID
    pub async fn get(&self, id: &str) -> Result<Option<Service>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_service))
    }

    /// List all services, by display order
    pub async fn list_all(&self) -> Result<Vec<Service>> {
        let rows = sqlx::query(&select("ORDER BY display_order ASC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_service).collect())
    }

    /// List active services only, by display order
    pub async fn list_active(&self) -> Result<Vec<Service>> {
        let rows = sqlx::query(&select("WHERE is_active = 1 ORDER BY display_order ASC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_service).collect())
    }

    /// Update a service
    pub async fn update(&self, service: &Service) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE services
            SET title = ?, description = ?, icon = ?, display_order = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.icon)
        .bind(service.display_order)
        .bind(service.is_active)
        .bind(&service.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a service. Messages referencing it keep their record with
    /// the reference cleared (ON DELETE SET NULL).
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a service exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, title, description, icon, display_order, is_active FROM services {suffix}"
    )
}

/// Convert a database row to a Service
fn row_to_service(row: sqlx::sqlite::SqliteRow) -> Service {
    Service {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        icon: row.get("icon"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_service() {
        let db = Database::in_memory().await.unwrap();
        let repo = ServiceRepository::new(&db);

        let service = Service::new("Web Development", "We build sites.", "fas fa-code");
        repo.create(&service).await.expect("Failed to create");

        let retrieved = repo
            .get(&service.id)
            .await
            .expect("Failed to get")
            .expect("Service should exist");

        assert_eq!(retrieved.title, "Web Development");
        assert_eq!(retrieved.icon, "fas fa-code");
        assert!(retrieved.is_active);
    }

    #[tokio::test]
    async fn test_list_ordered_by_display_order() {
        let db = Database::in_memory().await.unwrap();
        let repo = ServiceRepository::new(&db);

        repo.create(&Service::new("Third", "d", "i").with_display_order(3))
            .await
            .unwrap();
        repo.create(&Service::new("First", "d", "i").with_display_order(1))
            .await
            .unwrap();
        repo.create(&Service::new("Second", "d", "i").with_display_order(2))
            .await
            .unwrap();

        let services = repo.list_all().await.unwrap();
        let titles: Vec<_> = services.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_list_active_excludes_inactive() {
        let db = Database::in_memory().await.unwrap();
        let repo = ServiceRepository::new(&db);

        repo.create(&Service::new("Live", "d", "i")).await.unwrap();
        repo.create(&Service::new("Retired", "d", "i").with_active(false))
            .await
            .unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Live");
    }

    #[tokio::test]
    async fn test_update_and_delete_service() {
        let db = Database::in_memory().await.unwrap();
        let repo = ServiceRepository::new(&db);

        let mut service = Service::new("Consulting", "d", "i");
        repo.create(&service).await.unwrap();

        service.title = "Network Consulting".to_string();
        repo.update(&service).await.unwrap();

        let retrieved = repo.get(&service.id).await.unwrap().unwrap();
        assert_eq!(retrieved.title, "Network Consulting");

        repo.delete(&service.id).await.unwrap();
        assert!(!repo.exists(&service.id).await.unwrap());
    }
}
