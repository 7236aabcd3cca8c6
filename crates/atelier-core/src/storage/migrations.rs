//! Database migrations
//!
//! This module manages SQLite schema migrations for the Atelier record
//! store. Migrations are versioned and applied automatically on database
//! connection.

use sqlx::{Row, SqlitePool};
use tracing::info;

/// Current schema version
pub const CURRENT_VERSION: i32 = 1;

/// SQL for creating the migrations tracking table
const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Initial schema
const MIGRATION_V1: &str = r#"
    -- Portfolio projects
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        project_type TEXT NOT NULL CHECK (project_type IN ('web', 'mobile', 'ai', 'network', 'research', 'other')),
        image_path TEXT,
        completion_date DATE NOT NULL,
        project_url TEXT,
        github_url TEXT,
        technologies TEXT NOT NULL DEFAULT '',
        featured INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_projects_completion_date ON projects(completion_date);
    CREATE INDEX IF NOT EXISTS idx_projects_featured ON projects(featured);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_projects_slug ON projects(slug);

    -- Research papers
    CREATE TABLE IF NOT EXISTS research_papers (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        abstract TEXT NOT NULL,
        paper_type TEXT NOT NULL CHECK (paper_type IN ('academic', 'commercial', 'technical')),
        authors TEXT NOT NULL,
        publication_date DATE NOT NULL,
        venue TEXT,
        document_path TEXT,
        external_link TEXT,
        is_published INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_research_papers_publication_date ON research_papers(publication_date);
    CREATE INDEX IF NOT EXISTS idx_research_papers_is_published ON research_papers(is_published);

    -- Team members
    CREATE TABLE IF NOT EXISTS team_members (
        id TEXT PRIMARY KEY NOT NULL,
        user_account_id TEXT UNIQUE,
        name TEXT NOT NULL,
        position TEXT NOT NULL,
        bio TEXT NOT NULL,
        image_path TEXT,
        email TEXT,
        phone TEXT,
        join_date DATE NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        display_order INTEGER NOT NULL DEFAULT 0,
        linkedin_url TEXT,
        twitter_url TEXT,
        github_url TEXT,
        instagram_url TEXT,
        facebook_url TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_team_members_display_order ON team_members(display_order);
    CREATE INDEX IF NOT EXISTS idx_team_members_is_active ON team_members(is_active);

    -- Services offered on the site
    CREATE TABLE IF NOT EXISTS services (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        icon TEXT NOT NULL DEFAULT '',
        display_order INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1
    );

    CREATE INDEX IF NOT EXISTS idx_services_display_order ON services(display_order);

    -- Client testimonials
    CREATE TABLE IF NOT EXISTS testimonials (
        id TEXT PRIMARY KEY NOT NULL,
        client_name TEXT NOT NULL,
        client_position TEXT,
        client_company TEXT,
        content TEXT NOT NULL,
        image_path TEXT,
        project_id TEXT REFERENCES projects(id) ON DELETE SET NULL,
        rating INTEGER NOT NULL DEFAULT 5 CHECK (rating BETWEEN 1 AND 5),
        is_approved INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_testimonials_project_id ON testimonials(project_id);
    CREATE INDEX IF NOT EXISTS idx_testimonials_created_at ON testimonials(created_at);

    -- Contact-form messages
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        company TEXT,
        service_id TEXT REFERENCES services(id) ON DELETE SET NULL,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'read', 'replied', 'archived')),
        budget REAL,
        received_at TIMESTAMP NOT NULL,
        replied_at TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_messages_received_at ON messages(received_at);
    CREATE INDEX IF NOT EXISTS idx_messages_status ON messages(status);
    CREATE INDEX IF NOT EXISTS idx_messages_service_id ON messages(service_id);

    -- Pricing packages
    CREATE TABLE IF NOT EXISTS pricing_packages (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        package_type TEXT NOT NULL CHECK (package_type IN ('development', 'research', 'network')),
        price REAL NOT NULL,
        currency TEXT NOT NULL DEFAULT 'TZS',
        billing_period TEXT NOT NULL DEFAULT 'project',
        features TEXT NOT NULL DEFAULT '',
        is_featured INTEGER NOT NULL DEFAULT 0,
        display_order INTEGER NOT NULL DEFAULT 0,
        is_active INTEGER NOT NULL DEFAULT 1
    );

    CREATE INDEX IF NOT EXISTS idx_pricing_packages_package_type ON pricing_packages(package_type);
    CREATE INDEX IF NOT EXISTS idx_pricing_packages_is_active ON pricing_packages(is_active);
"#;

/// Look up the SQL for a migration version
fn migration_sql(version: i32) -> Option<&'static str> {
    match version {
        1 => Some(MIGRATION_V1),
        _ => None,
    }
}

/// Migration status report
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Highest applied migration version (0 if none)
    pub applied_version: i32,
    /// Latest known migration version
    pub current_version: i32,
    /// Whether any migrations are pending
    pub needs_migration: bool,
}

/// Get the highest applied migration version (0 if the tracking table is
/// missing or empty)
async fn applied_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    let table_exists: Option<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = '_migrations'",
    )
    .fetch_optional(pool)
    .await?;

    if table_exists.is_none() {
        return Ok(0);
    }

    let row = sqlx::query("SELECT COALESCE(MAX(version), 0) AS version FROM _migrations")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i32, _>("version"))
}

/// Check migration status without applying anything
pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let applied = applied_version(pool).await?;
    Ok(MigrationStatus {
        applied_version: applied,
        current_version: CURRENT_VERSION,
        needs_migration: applied < CURRENT_VERSION,
    })
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    let applied = applied_version(pool).await?;
    if applied >= CURRENT_VERSION {
        info!("Database schema is up to date (version {applied})");
        return Ok(());
    }

    for version in (applied + 1)..=CURRENT_VERSION {
        let sql = migration_sql(version)
            .ok_or_else(|| anyhow::anyhow!("Missing SQL for migration version {version}"))?;

        info!("Applying migration {version}");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!("Applied migration {version}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_migration_sql_known_versions() {
        assert!(migration_sql(1).is_some());
        assert!(migration_sql(CURRENT_VERSION + 1).is_none());
    }

    #[test]
    fn test_initial_schema_contents() {
        let sql = MIGRATION_V1;
        for table in [
            "projects",
            "research_papers",
            "team_members",
            "services",
            "testimonials",
            "messages",
            "pricing_packages",
        ] {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table}")),
                "schema should create table '{table}'"
            );
        }
        assert!(sql.contains("ON DELETE SET NULL"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::in_memory().await.unwrap();

        // A second run must be a no-op
        run_migrations(db.pool()).await.unwrap();

        let status = migration_status(db.pool()).await.unwrap();
        assert_eq!(status.applied_version, CURRENT_VERSION);
        assert!(!status.needs_migration);
    }
}
