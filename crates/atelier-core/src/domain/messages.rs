//! Contact-form messages
//!
//! Messages are created by the public submission workflow and only ever
//! mutated through status transitions. The received timestamp is set once
//! at creation; no update statement in this module touches it.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Message lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl MessageStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
            MessageStatus::Archived => "archived",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(MessageStatus::New),
            "read" => Some(MessageStatus::Read),
            "replied" => Some(MessageStatus::Replied),
            "archived" => Some(MessageStatus::Archived),
            _ => None,
        }
    }
}

/// A visitor-submitted contact message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    /// Optional reference to a service; cleared, not deleted, when that
    /// service is removed
    #[serde(default)]
    pub service_id: Option<String>,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub budget: Option<f64>,
    /// Set once at creation; immutable afterwards
    #[serde(default = "super::now")]
    pub received_at: DateTime<Utc>,
    #[serde(default)]
    pub replied_at: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a new message with status `new`, received now
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            name: name.into(),
            email: email.into(),
            phone: None,
            company: None,
            service_id: None,
            subject: subject.into(),
            body: body.into(),
            status: MessageStatus::New,
            budget: None,
            received_at: Utc::now(),
            replied_at: None,
        }
    }

    /// Set the phone number
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the company name
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Reference a service
    pub fn with_service(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Set the estimated budget
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Message repository for database operations
pub struct MessageRepository<'a> {
    db: &'a Database,
}

impl<'a> MessageRepository<'a> {
    /// Create a new message repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new message in the database
    pub async fn create(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, name, email, phone, company, service_id, subject,
                                  body, status, budget, received_at, replied_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.company)
        .bind(&message.service_id)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.status.as_str())
        .bind(message.budget)
        .bind(message.received_at)
        .bind(message.replied_at)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a message by ID
    pub async fn get(&self, id: &str) -> Result<Option<Message>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_message))
    }

    /// List all messages, most recently received first
    pub async fn list_all(&self) -> Result<Vec<Message>> {
        let rows = sqlx::query(&select("ORDER BY received_at DESC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_message).collect())
    }

    /// List messages with a given status, most recently received first
    pub async fn list_by_status(&self, status: MessageStatus) -> Result<Vec<Message>> {
        let rows = sqlx::query(&select("WHERE status = ? ORDER BY received_at DESC"))
            .bind(status.as_str())
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_message).collect())
    }

    /// Transition a message's status
    pub async fn set_status(&self, id: &str, status: MessageStatus) -> Result<()> {
        sqlx::query("UPDATE messages SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Mark a message as replied, stamping the reply time
    pub async fn mark_replied(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE messages SET status = 'replied', replied_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Delete a message
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Count all messages
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(self.db.pool())
            .await?;

        Ok(row.0)
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, name, email, phone, company, service_id, subject, body, status, \
         budget, received_at, replied_at \
         FROM messages {suffix}"
    )
}

/// Convert a database row to a Message
fn row_to_message(row: sqlx::sqlite::SqliteRow) -> Message {
    Message {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        company: row.get("company"),
        service_id: row.get("service_id"),
        subject: row.get("subject"),
        body: row.get("body"),
        status: MessageStatus::parse(row.get("status")).unwrap_or_default(),
        budget: row.get("budget"),
        received_at: row.get("received_at"),
        replied_at: row.get("replied_at"),
    }
}
