//! Research papers
//!
//! Provides CRUD operations for published and draft research output.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Research paper category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperType {
    #[default]
    Academic,
    Commercial,
    Technical,
}

impl PaperType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperType::Academic => "academic",
            PaperType::Commercial => "commercial",
            PaperType::Technical => "technical",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "academic" => Some(PaperType::Academic),
            "commercial" => Some(PaperType::Commercial),
            "technical" => Some(PaperType::Technical),
            _ => None,
        }
    }
}

/// A research paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchPaper {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub paper_type: PaperType,
    /// Comma-separated list of authors
    pub authors: String,
    pub publication_date: NaiveDate,
    /// Journal or conference name
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub document_path: Option<String>,
    #[serde(default)]
    pub external_link: Option<String>,
    /// Only published papers appear on the public research listing
    #[serde(default)]
    pub is_published: bool,
    #[serde(default = "super::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::now")]
    pub updated_at: DateTime<Utc>,
}

impl ResearchPaper {
    /// Create a new research paper
    pub fn new(
        title: impl Into<String>,
        abstract_text: impl Into<String>,
        paper_type: PaperType,
        authors: impl Into<String>,
        publication_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            paper_type,
            authors: authors.into(),
            publication_date,
            venue: None,
            document_path: None,
            external_link: None,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the journal or conference name
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = Some(venue.into());
        self
    }

    /// Set the published flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.is_published = published;
        self
    }
}

/// Research paper repository for database operations
pub struct ResearchPaperRepository<'a> {
    db: &'a Database,
}

impl<'a> ResearchPaperRepository<'a> {
    /// Create a new research paper repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new research paper in the database
    pub async fn create(&self, paper: &ResearchPaper) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO research_papers (id, title, abstract, paper_type, authors,
                                         publication_date, venue, document_path, external_link,
                                         is_published, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&paper.id)
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(paper.paper_type.as_str())
        .bind(&paper.authors)
        .bind(paper.publication_date)
        .bind(&paper.venue)
        .bind(&paper.document_path)
        .bind(&paper.external_link)
        .bind(paper.is_published)
        .bind(paper.created_at)
        .bind(paper.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a research paper by ID
    pub async fn get(&self, id: &str) -> Result<Option<ResearchPaper>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_paper))
    }

    /// List all papers, most recently published first
    pub async fn list_all(&self) -> Result<Vec<ResearchPaper>> {
        let rows = sqlx::query(&select("ORDER BY publication_date DESC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_paper).collect())
    }

    /// List published papers only, most recently published first
    pub async fn list_published(&self) -> Result<Vec<ResearchPaper>> {
        let rows = sqlx::query(&select(
            "WHERE is_published = 1 ORDER BY publication_date DESC",
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_paper).collect())
    }

    /// Update a research paper
    pub async fn update(&self, paper: &ResearchPaper) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE research_papers
            SET title = ?, abstract = ?, paper_type = ?, authors = ?, publication_date = ?,
                venue = ?, document_path = ?, external_link = ?, is_published = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&paper.title)
        .bind(&paper.abstract_text)
        .bind(paper.paper_type.as_str())
        .bind(&paper.authors)
        .bind(paper.publication_date)
        .bind(&paper.venue)
        .bind(&paper.document_path)
        .bind(&paper.external_link)
        .bind(paper.is_published)
        .bind(Utc::now())
        .bind(&paper.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a research paper
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM research_papers WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a paper exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM research_papers WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, title, abstract, paper_type, authors, publication_date, venue, \
         document_path, external_link, is_published, created_at, updated_at \
         FROM research_papers {suffix}"
    )
}

/// Convert a database row to a ResearchPaper
fn row_to_paper(row: sqlx::sqlite::SqliteRow) -> ResearchPaper {
    ResearchPaper {
        id: row.get("id"),
        title: row.get("title"),
        abstract_text: row.get("abstract"),
        paper_type: PaperType::parse(row.get("paper_type")).unwrap_or_default(),
        authors: row.get("authors"),
        publication_date: row.get("publication_date"),
        venue: row.get("venue"),
        document_path: row.get("document_path"),
        external_link: row.get("external_link"),
        is_published: row.get("is_published"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: &str, date: &str, published: bool) -> ResearchPaper {
        ResearchPaper::new(
            title,
            "We study the thing.",
            PaperType::Academic,
            "A. Author, B. Author",
            date.parse().unwrap(),
        )
        .with_published(published)
    }

    #[tokio::test]
    async fn test_create_and_get_paper() {
        let db = Database::in_memory().await.unwrap();
        let repo = ResearchPaperRepository::new(&db);

        let paper = sample("Edge Caching", "2024-03-01", true).with_venue("NetConf 2024");
        repo.create(&paper).await.expect("Failed to create");

        let retrieved = repo
            .get(&paper.id)
            .await
            .expect("Failed to get")
            .expect("Paper should exist");

        assert_eq!(retrieved.title, "Edge Caching");
        assert_eq!(retrieved.venue, Some("NetConf 2024".to_string()));
        assert!(retrieved.is_published);
    }

    #[tokio::test]
    async fn test_list_published_excludes_drafts() {
        let db = Database::in_memory().await.unwrap();
        let repo = ResearchPaperRepository::new(&db);

        repo.create(&sample("Published", "2024-01-01", true))
            .await
            .unwrap();
        repo.create(&sample("Draft", "2024-02-01", false))
            .await
            .unwrap();

        let published = repo.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Published");

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_list_ordered_by_publication_date() {
        let db = Database::in_memory().await.unwrap();
        let repo = ResearchPaperRepository::new(&db);

        repo.create(&sample("Old", "2021-05-01", true)).await.unwrap();
        repo.create(&sample("New", "2024-05-01", true)).await.unwrap();
        repo.create(&sample("Mid", "2023-05-01", true)).await.unwrap();

        let papers = repo.list_published().await.unwrap();
        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_paper() {
        let db = Database::in_memory().await.unwrap();
        let repo = ResearchPaperRepository::new(&db);

        let mut paper = sample("Draft", "2024-01-01", false);
        repo.create(&paper).await.unwrap();

        paper.is_published = true;
        paper.paper_type = PaperType::Technical;
        repo.update(&paper).await.unwrap();

        let retrieved = repo.get(&paper.id).await.unwrap().unwrap();
        assert!(retrieved.is_published);
        assert_eq!(retrieved.paper_type, PaperType::Technical);

        repo.delete(&paper.id).await.unwrap();
        assert!(!repo.exists(&paper.id).await.unwrap());
    }

    #[test]
    fn test_paper_type_round_trip() {
        for ty in [PaperType::Academic, PaperType::Commercial, PaperType::Technical] {
            assert_eq!(PaperType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(PaperType::parse("fiction"), None);
    }
}
