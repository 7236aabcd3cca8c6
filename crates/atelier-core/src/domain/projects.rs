//! Portfolio projects
//!
//! Provides CRUD operations for showcased projects.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Project category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Web,
    Mobile,
    Ai,
    Network,
    Research,
    #[default]
    Other,
}

impl ProjectType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Web => "web",
            ProjectType::Mobile => "mobile",
            ProjectType::Ai => "ai",
            ProjectType::Network => "network",
            ProjectType::Research => "research",
            ProjectType::Other => "other",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "web" => Some(ProjectType::Web),
            "mobile" => Some(ProjectType::Mobile),
            "ai" => Some(ProjectType::Ai),
            "network" => Some(ProjectType::Network),
            "research" => Some(ProjectType::Research),
            "other" => Some(ProjectType::Other),
            _ => None,
        }
    }
}

/// A showcased project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub title: String,
    /// URL-safe identifier, unique across projects
    pub slug: String,
    pub description: String,
    pub project_type: ProjectType,
    #[serde(default)]
    pub image_path: Option<String>,
    pub completion_date: NaiveDate,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    /// Comma-separated list of technologies
    #[serde(default)]
    pub technologies: String,
    /// Marks the project for promotional display on the landing page
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "super::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::now")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project with the given details
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
        project_type: ProjectType,
        completion_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
            project_type,
            image_path: None,
            completion_date,
            project_url: None,
            github_url: None,
            technologies: String::new(),
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the comma-separated technology list
    pub fn with_technologies(mut self, technologies: impl Into<String>) -> Self {
        self.technologies = technologies.into();
        self
    }

    /// Set the featured flag
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    /// Set the public project URL
    pub fn with_project_url(mut self, url: impl Into<String>) -> Self {
        self.project_url = Some(url.into());
        self
    }

    /// Technologies as individual entries
    pub fn technologies_list(&self) -> Vec<String> {
        self.technologies
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Project repository for database operations
pub struct ProjectRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new project in the database
    pub async fn create(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, title, slug, description, project_type, image_path,
                                  completion_date, project_url, github_url, technologies,
                                  featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(project.project_type.as_str())
        .bind(&project.image_path)
        .bind(project.completion_date)
        .bind(&project.project_url)
        .bind(&project.github_url)
        .bind(&project.technologies)
        .bind(project.featured)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a project by ID
    pub async fn get(&self, id: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_project))
    }

    /// Get a project by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        let row = sqlx::query(&select("WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_project))
    }

    /// List all projects, most recently completed first
    pub async fn list_all(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(&select("ORDER BY completion_date DESC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_project).collect())
    }

    /// List featured projects up to the given limit, default ordering
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Project>> {
        let rows = sqlx::query(&select(
            "WHERE featured = 1 ORDER BY completion_date DESC LIMIT ?",
        ))
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_project).collect())
    }

    /// Update a project
    pub async fn update(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE projects
            SET title = ?, slug = ?, description = ?, project_type = ?, image_path = ?,
                completion_date = ?, project_url = ?, github_url = ?, technologies = ?,
                featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(project.project_type.as_str())
        .bind(&project.image_path)
        .bind(project.completion_date)
        .bind(&project.project_url)
        .bind(&project.github_url)
        .bind(&project.technologies)
        .bind(project.featured)
        .bind(Utc::now())
        .bind(&project.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a project. Testimonials referencing it keep their record
    /// with the reference cleared (ON DELETE SET NULL).
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a project exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Check if a project with the given slug exists
    pub async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

/// Create a project after checking slug uniqueness, for a friendlier
/// error than the raw constraint violation
pub async fn create_project(db: &Database, project: &Project) -> Result<Project> {
    let repo = ProjectRepository::new(db);

    if repo.slug_exists(&project.slug).await? {
        return Err(crate::Error::Validation(format!(
            "A project with slug '{}' already exists",
            project.slug
        )));
    }

    repo.create(project).await?;
    Ok(project.clone())
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, title, slug, description, project_type, image_path, completion_date, \
         project_url, github_url, technologies, featured, created_at, updated_at \
         FROM projects {suffix}"
    )
}

/// Convert a database row to a Project
fn row_to_project(row: sqlx::sqlite::SqliteRow) -> Project {
    Project {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        description: row.get("description"),
        project_type: ProjectType::parse(row.get("project_type")).unwrap_or_default(),
        image_path: row.get("image_path"),
        completion_date: row.get("completion_date"),
        project_url: row.get("project_url"),
        github_url: row.get("github_url"),
        technologies: row.get("technologies"),
        featured: row.get("featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, slug: &str, date: &str) -> Project {
        Project::new(
            title,
            slug,
            "A showcased project",
            ProjectType::Web,
            date.parse().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let project = sample("Shop Platform", "shop-platform", "2024-06-01")
            .with_technologies("Rust, SQLite, Axum")
            .with_project_url("https://shop.example.com");
        repo.create(&project).await.expect("Failed to create");

        let retrieved = repo
            .get(&project.id)
            .await
            .expect("Failed to get")
            .expect("Project should exist");

        assert_eq!(retrieved.title, "Shop Platform");
        assert_eq!(retrieved.slug, "shop-platform");
        assert_eq!(retrieved.project_type, ProjectType::Web);
        assert_eq!(
            retrieved.project_url,
            Some("https://shop.example.com".to_string())
        );
        assert!(!retrieved.featured);
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let project = sample("Network Audit", "network-audit", "2023-02-10");
        repo.create(&project).await.unwrap();

        let retrieved = repo
            .get_by_slug("network-audit")
            .await
            .unwrap()
            .expect("Project should be found by slug");
        assert_eq!(retrieved.id, project.id);

        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slug_must_be_unique() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        repo.create(&sample("First", "same-slug", "2023-01-01"))
            .await
            .unwrap();

        let result = repo.create(&sample("Second", "same-slug", "2024-01-01")).await;
        assert!(result.is_err(), "Duplicate slug should be rejected");
        assert!(repo.slug_exists("same-slug").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_project_reports_duplicate_slug() {
        let db = Database::in_memory().await.unwrap();

        create_project(&db, &sample("First", "dup", "2023-01-01"))
            .await
            .unwrap();

        let err = create_project(&db, &sample("Second", "dup", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
        assert!(err.to_string().contains("dup"));
    }

    #[tokio::test]
    async fn test_list_all_ordered_by_completion_date() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        repo.create(&sample("Mid", "mid", "2023-01-01")).await.unwrap();
        repo.create(&sample("New", "new", "2024-06-01")).await.unwrap();
        repo.create(&sample("Old", "old", "2022-03-01")).await.unwrap();

        let projects = repo.list_all().await.unwrap();
        let titles: Vec<_> = projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn test_list_featured_respects_limit() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        for i in 0..8 {
            let project = sample(
                &format!("Project {i}"),
                &format!("project-{i}"),
                "2024-01-01",
            )
            .with_featured(true);
            repo.create(&project).await.unwrap();
        }
        repo.create(&sample("Plain", "plain", "2024-01-01"))
            .await
            .unwrap();

        let featured = repo.list_featured(6).await.unwrap();
        assert_eq!(featured.len(), 6);
        assert!(featured.iter().all(|p| p.featured));
    }

    #[tokio::test]
    async fn test_update_project() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let mut project = sample("Draft", "draft", "2024-01-01");
        repo.create(&project).await.unwrap();

        project.title = "Final".to_string();
        project.featured = true;
        repo.update(&project).await.unwrap();

        let retrieved = repo.get(&project.id).await.unwrap().unwrap();
        assert_eq!(retrieved.title, "Final");
        assert!(retrieved.featured);
        assert!(retrieved.updated_at >= retrieved.created_at);
    }

    #[tokio::test]
    async fn test_delete_project() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let project = sample("Gone", "gone", "2024-01-01");
        repo.create(&project).await.unwrap();
        assert!(repo.exists(&project.id).await.unwrap());

        repo.delete(&project.id).await.unwrap();
        assert!(!repo.exists(&project.id).await.unwrap());
    }

    #[test]
    fn test_technologies_list() {
        let project = Project::new(
            "T",
            "t",
            "d",
            ProjectType::Ai,
            "2024-01-01".parse().unwrap(),
        )
        .with_technologies("Rust, Python , TensorFlow");

        assert_eq!(
            project.technologies_list(),
            vec!["Rust", "Python", "TensorFlow"]
        );

        let empty = Project::new(
            "E",
            "e",
            "d",
            ProjectType::Other,
            "2024-01-01".parse().unwrap(),
        );
        assert!(empty.technologies_list().is_empty());
    }

    #[test]
    fn test_project_type_round_trip() {
        for ty in [
            ProjectType::Web,
            ProjectType::Mobile,
            ProjectType::Ai,
            ProjectType::Network,
            ProjectType::Research,
            ProjectType::Other,
        ] {
            assert_eq!(ProjectType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(ProjectType::parse("unknown"), None);
    }
}
