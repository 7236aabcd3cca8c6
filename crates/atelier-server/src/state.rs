//! Shared application state

use std::sync::Arc;

use atelier_core::config::Config;
use atelier_core::mail::Mailer;
use atelier_core::storage::Database;

/// State shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, mailer: Arc<dyn Mailer>, config: Arc<Config>) -> Self {
        Self { db, mailer, config }
    }
}
