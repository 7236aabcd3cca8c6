//! Team members
//!
//! Provides CRUD operations for team member profiles.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// A team member profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    #[serde(default = "super::new_id")]
    pub id: String,
    /// Optional link to a user account; at most one member per account
    #[serde(default)]
    pub user_account_id: Option<String>,
    pub name: String,
    pub position: String,
    pub bio: String,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "super::today")]
    pub join_date: NaiveDate,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub twitter_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub instagram_url: Option<String>,
    #[serde(default)]
    pub facebook_url: Option<String>,
    #[serde(default = "super::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::now")]
    pub updated_at: DateTime<Utc>,
}

impl TeamMember {
    /// Create a new team member joining today
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_account_id: None,
            name: name.into(),
            position: position.into(),
            bio: bio.into(),
            image_path: None,
            email: None,
            phone: None,
            join_date: now.date_naive(),
            is_active: true,
            display_order: 0,
            linkedin_url: None,
            twitter_url: None,
            github_url: None,
            instagram_url: None,
            facebook_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the display order
    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = order;
        self
    }

    /// Set the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Link to a user account
    pub fn with_user_account(mut self, account_id: impl Into<String>) -> Self {
        self.user_account_id = Some(account_id.into());
        self
    }

    /// Set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

/// Team member repository for database operations
pub struct TeamMemberRepository<'a> {
    db: &'a Database,
}

impl<'a> TeamMemberRepository<'a> {
    /// Create a new team member repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new team member in the database
    pub async fn create(&self, member: &TeamMember) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO team_members (id, user_account_id, name, position, bio, image_path,
                                      email, phone, join_date, is_active, display_order,
                                      linkedin_url, twitter_url, github_url, instagram_url,
                                      facebook_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&member.id)
        .bind(&member.user_account_id)
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.bio)
        .bind(&member.image_path)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.join_date)
        .bind(member.is_active)
        .bind(member.display_order)
        .bind(&member.linkedin_url)
        .bind(&member.twitter_url)
        .bind(&member.github_url)
        .bind(&member.instagram_url)
        .bind(&member.facebook_url)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a team member by ID
    pub async fn get(&self, id: &str) -> Result<Option<TeamMember>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_member))
    }

    /// List all team members, by display order then name
    pub async fn list_all(&self) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query(&select("ORDER BY display_order ASC, name ASC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_member).collect())
    }

    /// List active team members only, by display order then name
    pub async fn list_active(&self) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query(&select(
            "WHERE is_active = 1 ORDER BY display_order ASC, name ASC",
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_member).collect())
    }

    /// Update a team member
    pub async fn update(&self, member: &TeamMember) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE team_members
            SET user_account_id = ?, name = ?, position = ?, bio = ?, image_path = ?,
                email = ?, phone = ?, join_date = ?, is_active = ?, display_order = ?,
                linkedin_url = ?, twitter_url = ?, github_url = ?, instagram_url = ?,
                facebook_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&member.user_account_id)
        .bind(&member.name)
        .bind(&member.position)
        .bind(&member.bio)
        .bind(&member.image_path)
        .bind(&member.email)
        .bind(&member.phone)
        .bind(member.join_date)
        .bind(member.is_active)
        .bind(member.display_order)
        .bind(&member.linkedin_url)
        .bind(&member.twitter_url)
        .bind(&member.github_url)
        .bind(&member.instagram_url)
        .bind(&member.facebook_url)
        .bind(Utc::now())
        .bind(&member.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a team member
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a team member exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM team_members WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, user_account_id, name, position, bio, image_path, email, phone, \
         join_date, is_active, display_order, linkedin_url, twitter_url, github_url, \
         instagram_url, facebook_url, created_at, updated_at \
         FROM team_members {suffix}"
    )
}

/// Convert a database row to a TeamMember
fn row_to_member(row: sqlx::sqlite::SqliteRow) -> TeamMember {
    TeamMember {
        id: row.get("id"),
        user_account_id: row.get("user_account_id"),
        name: row.get("name"),
        position: row.get("position"),
        bio: row.get("bio"),
        image_path: row.get("image_path"),
        email: row.get("email"),
        phone: row.get("phone"),
        join_date: row.get("join_date"),
        is_active: row.get("is_active"),
        display_order: row.get("display_order"),
        linkedin_url: row.get("linkedin_url"),
        twitter_url: row.get("twitter_url"),
        github_url: row.get("github_url"),
        instagram_url: row.get("instagram_url"),
        facebook_url: row.get("facebook_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_member() {
        let db = Database::in_memory().await.unwrap();
        let repo = TeamMemberRepository::new(&db);

        let member = TeamMember::new("Asha Mrema", "Lead Engineer", "Builds things.")
            .with_email("asha@example.com")
            .with_display_order(2);
        repo.create(&member).await.expect("Failed to create");

        let retrieved = repo
            .get(&member.id)
            .await
            .expect("Failed to get")
            .expect("Member should exist");

        assert_eq!(retrieved.name, "Asha Mrema");
        assert_eq!(retrieved.email, Some("asha@example.com".to_string()));
        assert_eq!(retrieved.display_order, 2);
        assert!(retrieved.is_active);
    }

    #[tokio::test]
    async fn test_list_ordered_by_display_order_then_name() {
        let db = Database::in_memory().await.unwrap();
        let repo = TeamMemberRepository::new(&db);

        repo.create(&TeamMember::new("Zuri", "Designer", "b").with_display_order(0))
            .await
            .unwrap();
        repo.create(&TeamMember::new("Amani", "Designer", "b").with_display_order(0))
            .await
            .unwrap();
        repo.create(&TeamMember::new("Baraka", "Founder", "b").with_display_order(1))
            .await
            .unwrap();

        let members = repo.list_all().await.unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Amani", "Zuri", "Baraka"]);
    }

    #[tokio::test]
    async fn test_list_active_excludes_inactive() {
        let db = Database::in_memory().await.unwrap();
        let repo = TeamMemberRepository::new(&db);

        repo.create(&TeamMember::new("Active", "Eng", "b"))
            .await
            .unwrap();
        repo.create(&TeamMember::new("Former", "Eng", "b").with_active(false))
            .await
            .unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Active");
    }

    #[tokio::test]
    async fn test_one_member_per_user_account() {
        let db = Database::in_memory().await.unwrap();
        let repo = TeamMemberRepository::new(&db);

        repo.create(&TeamMember::new("First", "Eng", "b").with_user_account("acct-1"))
            .await
            .unwrap();

        let result = repo
            .create(&TeamMember::new("Second", "Eng", "b").with_user_account("acct-1"))
            .await;
        assert!(
            result.is_err(),
            "Two members must not share a user account"
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_member() {
        let db = Database::in_memory().await.unwrap();
        let repo = TeamMemberRepository::new(&db);

        let mut member = TeamMember::new("Neema", "Analyst", "b");
        repo.create(&member).await.unwrap();

        member.position = "Senior Analyst".to_string();
        member.is_active = false;
        repo.update(&member).await.unwrap();

        let retrieved = repo.get(&member.id).await.unwrap().unwrap();
        assert_eq!(retrieved.position, "Senior Analyst");
        assert!(!retrieved.is_active);

        repo.delete(&member.id).await.unwrap();
        assert!(!repo.exists(&member.id).await.unwrap());
    }
}
