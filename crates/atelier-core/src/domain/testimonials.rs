//! Client testimonials
//!
//! Provides CRUD operations for testimonials. Only approved testimonials
//! are shown on the landing page.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

fn default_rating() -> i64 {
    5
}

/// A client testimonial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_position: Option<String>,
    #[serde(default)]
    pub client_company: Option<String>,
    pub content: String,
    #[serde(default)]
    pub image_path: Option<String>,
    /// Optional reference to a showcased project; cleared, not deleted,
    /// when that project is removed
    #[serde(default)]
    pub project_id: Option<String>,
    /// Rating from 1 to 5
    #[serde(default = "default_rating")]
    pub rating: i64,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default = "super::now")]
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    /// Create a new unapproved testimonial with the default rating
    pub fn new(client_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            client_name: client_name.into(),
            client_position: None,
            client_company: None,
            content: content.into(),
            image_path: None,
            project_id: None,
            rating: default_rating(),
            is_approved: false,
            created_at: Utc::now(),
        }
    }

    /// Set the client's company
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.client_company = Some(company.into());
        self
    }

    /// Reference a showcased project
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the rating (1..=5)
    pub fn with_rating(mut self, rating: i64) -> Self {
        self.rating = rating;
        self
    }

    /// Set the approved flag
    pub fn with_approved(mut self, approved: bool) -> Self {
        self.is_approved = approved;
        self
    }
}

/// Testimonial repository for database operations
pub struct TestimonialRepository<'a> {
    db: &'a Database,
}

impl<'a> TestimonialRepository<'a> {
    /// Create a new testimonial repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new testimonial in the database
    pub async fn create(&self, testimonial: &Testimonial) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO testimonials (id, client_name, client_position, client_company,
                                      content, image_path, project_id, rating, is_approved,
                                      created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&testimonial.id)
        .bind(&testimonial.client_name)
        .bind(&testimonial.client_position)
        .bind(&testimonial.client_company)
        .bind(&testimonial.content)
        .bind(&testimonial.image_path)
        .bind(&testimonial.project_id)
        .bind(testimonial.rating)
        .bind(testimonial.is_approved)
        .bind(testimonial.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a testimonial by ID
    pub async fn get(&self, id: &str) -> Result<Option<Testimonial>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_testimonial))
    }

    /// List all testimonials, newest first
    pub async fn list_all(&self) -> Result<Vec<Testimonial>> {
        let rows = sqlx::query(&select("ORDER BY created_at DESC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_testimonial).collect())
    }

    /// List approved testimonials up to the given limit, newest first
    pub async fn list_approved(&self, limit: i64) -> Result<Vec<Testimonial>> {
        let rows = sqlx::query(&select(
            "WHERE is_approved = 1 ORDER BY created_at DESC LIMIT ?",
        ))
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_testimonial).collect())
    }

    /// Update a testimonial
    pub async fn update(&self, testimonial: &Testimonial) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE testimonials
            SET client_name = ?, client_position = ?, client_company = ?, content = ?,
                image_path = ?, project_id = ?, rating = ?, is_approved = ?
            WHERE id = ?
            "#,
        )
        .bind(&testimonial.client_name)
        .bind(&testimonial.client_position)
        .bind(&testimonial.client_company)
        .bind(&testimonial.content)
        .bind(&testimonial.image_path)
        .bind(&testimonial.project_id)
        .bind(testimonial.rating)
        .bind(testimonial.is_approved)
        .bind(&testimonial.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Approve a testimonial for public display
    pub async fn approve(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE testimonials SET is_approved = 1 WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Delete a testimonial
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM testimonials WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a testimonial exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM testimonials WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, client_name, client_position, client_company, content, image_path, \
         project_id, rating, is_approved, created_at \
         FROM testimonials {suffix}"
    )
}

/// Convert a database row to a Testimonial
fn row_to_testimonial(row: sqlx::sqlite::SqliteRow) -> Testimonial {
    Testimonial {
        id: row.get("id"),
        client_name: row.get("client_name"),
        client_position: row.get("client_position"),
        client_company: row.get("client_company"),
        content: row.get("content"),
        image_path: row.get("image_path"),
        project_id: row.get("project_id"),
        rating: row.get("rating"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
    }
}
