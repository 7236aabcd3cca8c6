//! Atelier admin CLI
//!
//! Administrative CRUD over the record store, driven by the declarative
//! admin bindings: generic list/search/filter/show/create/delete per
//! entity, plus message status transitions.

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use atelier_core::admin::{self, AdminBinding};
use atelier_core::config::Config;
use atelier_core::domain::messages::{MessageRepository, MessageStatus};
use atelier_core::domain::pricing::{PricingPackage, PricingPackageRepository};
use atelier_core::domain::projects::{create_project, Project, ProjectRepository};
use atelier_core::domain::research::{ResearchPaper, ResearchPaperRepository};
use atelier_core::domain::services::{Service, ServiceRepository};
use atelier_core::domain::team::{TeamMember, TeamMemberRepository};
use atelier_core::domain::testimonials::{Testimonial, TestimonialRepository};
use atelier_core::storage::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Portfolio site administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage portfolio projects
    Projects {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage research papers
    Research {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage team members
    Team {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage services
    Services {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage testimonials
    Testimonials {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Manage contact messages
    Messages {
        #[command(subcommand)]
        action: MessageAction,
    },

    /// Manage pricing packages
    Pricing {
        #[command(subcommand)]
        action: EntityAction,
    },

    /// Run record store health check
    Doctor,
}

#[derive(Subcommand)]
enum EntityAction {
    /// List records
    List {
        /// Case-insensitive search over the entity's search fields
        #[arg(short, long)]
        search: Option<String>,
        /// Filter as field=value (repeatable, fields per binding)
        #[arg(short, long)]
        filter: Vec<String>,
    },
    /// Show one record
    Show { id: String },
    /// Create a record from a JSON file ('-' reads stdin)
    Create {
        #[arg(long)]
        json: String,
    },
    /// Delete a record
    Delete { id: String },
}

#[derive(Subcommand)]
enum MessageAction {
    /// List messages, newest first
    List {
        /// Case-insensitive search over name, email, subject, and body
        #[arg(short, long)]
        search: Option<String>,
        /// Filter as field=value (e.g. status=new)
        #[arg(short, long)]
        filter: Vec<String>,
    },
    /// Show one message
    Show { id: String },
    /// Transition a message's status (new, read, replied, archived).
    /// Setting 'replied' stamps the reply time.
    SetStatus { id: String, status: String },
    /// Delete a message
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let db = open_database(&config).await?;

    match cli.command {
        Commands::Projects { action } => run_entity_action(&db, "projects", action, cli.format).await,
        Commands::Research { action } => run_entity_action(&db, "research", action, cli.format).await,
        Commands::Team { action } => run_entity_action(&db, "team", action, cli.format).await,
        Commands::Services { action } => run_entity_action(&db, "services", action, cli.format).await,
        Commands::Testimonials { action } => {
            run_entity_action(&db, "testimonials", action, cli.format).await
        }
        Commands::Pricing { action } => run_entity_action(&db, "pricing", action, cli.format).await,
        Commands::Messages { action } => run_message_action(&db, action, cli.format).await,
        Commands::Doctor => doctor(&db).await,
    }
}

async fn open_database(config: &Config) -> anyhow::Result<Database> {
    let db_config = match &config.database.path {
        Some(path) => DatabaseConfig::with_path(path),
        None => DatabaseConfig::default(),
    };
    debug!("Opening record store at {}", db_config.path.display());
    Database::new(db_config).await
}

async fn run_entity_action(
    db: &Database,
    entity: &'static str,
    action: EntityAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let binding = admin::binding(entity)
        .ok_or_else(|| anyhow!("No admin binding for entity '{entity}'"))?;

    match action {
        EntityAction::List { search, filter } => {
            let rows = fetch_rows(db, entity).await?;
            let rows = apply_listing_args(rows, binding, search.as_deref(), &filter)?;
            print_listing(binding, &rows, format);
            Ok(())
        }
        EntityAction::Show { id } => {
            let row = fetch_row(db, entity, &id)
                .await?
                .ok_or_else(|| atelier_core::Error::NotFound(entity, id.clone()))?;
            println!("{}", serde_json::to_string_pretty(&row)?);
            Ok(())
        }
        EntityAction::Create { json } => {
            let text = read_json_input(&json)?;
            let id = create_from_json(db, entity, &text).await?;
            println!("Created {entity} record {id}");
            Ok(())
        }
        EntityAction::Delete { id } => {
            delete_row(db, entity, &id).await?;
            println!("Deleted {entity} record {id}");
            Ok(())
        }
    }
}

async fn run_message_action(
    db: &Database,
    action: MessageAction,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match action {
        MessageAction::List { search, filter } => {
            run_entity_action(db, "messages", EntityAction::List { search, filter }, format).await
        }
        MessageAction::Show { id } => {
            run_entity_action(db, "messages", EntityAction::Show { id }, format).await
        }
        MessageAction::Delete { id } => {
            run_entity_action(db, "messages", EntityAction::Delete { id }, format).await
        }
        MessageAction::SetStatus { id, status } => {
            let status = MessageStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown status '{status}' (expected new, read, replied, or archived)"))?;

            let repo = MessageRepository::new(db);
            if repo.get(&id).await?.is_none() {
                return Err(atelier_core::Error::NotFound("messages", id).into());
            }

            if status == MessageStatus::Replied {
                repo.mark_replied(&id).await?;
            } else {
                repo.set_status(&id, status).await?;
            }

            println!("Message {id} is now {}", status.as_str());
            Ok(())
        }
    }
}

async fn doctor(db: &Database) -> anyhow::Result<()> {
    db.health_check().await.context("Record store health check failed")?;
    let status = db.migration_status().await?;

    println!("Record store: ok");
    println!(
        "Schema version: {} (latest {})",
        status.applied_version, status.current_version
    );
    if status.needs_migration {
        println!("Pending migrations detected; they run automatically on next start");
    }
    Ok(())
}

/// Fetch every record of an entity kind as JSON rows, default ordering
async fn fetch_rows(db: &Database, entity: &'static str) -> anyhow::Result<Vec<Value>> {
    let rows = match entity {
        "projects" => to_rows(ProjectRepository::new(db).list_all().await?)?,
        "research" => to_rows(ResearchPaperRepository::new(db).list_all().await?)?,
        "team" => to_rows(TeamMemberRepository::new(db).list_all().await?)?,
        "services" => to_rows(ServiceRepository::new(db).list_all().await?)?,
        "testimonials" => to_rows(TestimonialRepository::new(db).list_all().await?)?,
        "messages" => to_rows(MessageRepository::new(db).list_all().await?)?,
        "pricing" => to_rows(PricingPackageRepository::new(db).list_all().await?)?,
        other => return Err(anyhow!("Unknown entity '{other}'")),
    };
    Ok(rows)
}

/// Fetch one record as a JSON row
async fn fetch_row(db: &Database, entity: &'static str, id: &str) -> anyhow::Result<Option<Value>> {
    let row = match entity {
        "projects" => to_row(ProjectRepository::new(db).get(id).await?)?,
        "research" => to_row(ResearchPaperRepository::new(db).get(id).await?)?,
        "team" => to_row(TeamMemberRepository::new(db).get(id).await?)?,
        "services" => to_row(ServiceRepository::new(db).get(id).await?)?,
        "testimonials" => to_row(TestimonialRepository::new(db).get(id).await?)?,
        "messages" => to_row(MessageRepository::new(db).get(id).await?)?,
        "pricing" => to_row(PricingPackageRepository::new(db).get(id).await?)?,
        other => return Err(anyhow!("Unknown entity '{other}'")),
    };
    Ok(row)
}

/// Create a record from admin-supplied JSON; missing id/timestamps are
/// filled with defaults
async fn create_from_json(db: &Database, entity: &'static str, text: &str) -> anyhow::Result<String> {
    let id = match entity {
        "projects" => {
            let record: Project = serde_json::from_str(text)?;
            create_project(db, &record).await?;
            record.id
        }
        "research" => {
            let record: ResearchPaper = serde_json::from_str(text)?;
            ResearchPaperRepository::new(db).create(&record).await?;
            record.id
        }
        "team" => {
            let record: TeamMember = serde_json::from_str(text)?;
            TeamMemberRepository::new(db).create(&record).await?;
            record.id
        }
        "services" => {
            let record: Service = serde_json::from_str(text)?;
            ServiceRepository::new(db).create(&record).await?;
            record.id
        }
        "testimonials" => {
            let record: Testimonial = serde_json::from_str(text)?;
            TestimonialRepository::new(db).create(&record).await?;
            record.id
        }
        "pricing" => {
            let record: PricingPackage = serde_json::from_str(text)?;
            PricingPackageRepository::new(db).create(&record).await?;
            record.id
        }
        // Messages are created by the public submission workflow only
        "messages" => return Err(anyhow!("Messages are created through the contact form")),
        other => return Err(anyhow!("Unknown entity '{other}'")),
    };
    Ok(id)
}

async fn delete_row(db: &Database, entity: &'static str, id: &str) -> anyhow::Result<()> {
    if fetch_row(db, entity, id).await?.is_none() {
        return Err(atelier_core::Error::NotFound(entity, id.to_string()).into());
    }

    match entity {
        "projects" => ProjectRepository::new(db).delete(id).await?,
        "research" => ResearchPaperRepository::new(db).delete(id).await?,
        "team" => TeamMemberRepository::new(db).delete(id).await?,
        "services" => ServiceRepository::new(db).delete(id).await?,
        "testimonials" => TestimonialRepository::new(db).delete(id).await?,
        "messages" => MessageRepository::new(db).delete(id).await?,
        "pricing" => PricingPackageRepository::new(db).delete(id).await?,
        other => return Err(anyhow!("Unknown entity '{other}'")),
    }
    Ok(())
}

fn to_rows<T: serde::Serialize>(records: Vec<T>) -> anyhow::Result<Vec<Value>> {
    records
        .into_iter()
        .map(|r| serde_json::to_value(r).map_err(Into::into))
        .collect()
}

fn to_row<T: serde::Serialize>(record: Option<T>) -> anyhow::Result<Option<Value>> {
    record.map(|r| serde_json::to_value(r).map_err(Into::into)).transpose()
}

/// Apply `--search` and `--filter key=value` to fetched rows
fn apply_listing_args(
    rows: Vec<Value>,
    binding: &AdminBinding,
    search: Option<&str>,
    filters: &[String],
) -> anyhow::Result<Vec<Value>> {
    let mut parsed_filters = Vec::new();
    for filter in filters {
        let (field, value) = filter
            .split_once('=')
            .ok_or_else(|| anyhow!("Filter '{filter}' must be field=value"))?;
        if !binding.list_filter.iter().any(|f| *f == field) {
            return Err(anyhow!(
                "'{field}' is not a filter field for {} (allowed: {})",
                binding.entity,
                binding.list_filter.join(", ")
            ));
        }
        parsed_filters.push((field.to_string(), value.to_string()));
    }

    Ok(rows
        .into_iter()
        .filter(|row| {
            parsed_filters
                .iter()
                .all(|(field, value)| admin::matches_filter(row, field, value))
        })
        .filter(|row| match search {
            Some(term) => admin::matches_search(row, binding, term),
            None => true,
        })
        .collect())
}

/// Print a listing: display columns in text mode, full rows in JSON mode
fn print_listing(binding: &AdminBinding, rows: &[Value], format: OutputFormat) {
    if format == OutputFormat::Json {
        println!(
            "{}",
            serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
        );
        return;
    }

    let mut header = vec!["id".to_string()];
    header.extend(binding.list_display.iter().map(|c| c.to_string()));

    let mut table = vec![header];
    for row in rows {
        let mut cells = vec![row.get("id").and_then(Value::as_str).unwrap_or("").to_string()];
        cells.extend(admin::display_row(row, binding));
        table.push(cells);
    }

    let widths: Vec<usize> = (0..table[0].len())
        .map(|col| {
            table
                .iter()
                .map(|r| r.get(col).map_or(0, String::len))
                .max()
                .unwrap_or(0)
        })
        .collect();

    for row in &table {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect();
        println!("{}", line.join("  ").trim_end());
    }
    println!("{} record(s)", rows.len());
}

fn read_json_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .context("Failed to read JSON from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read JSON file: {path}"))
    }
}
