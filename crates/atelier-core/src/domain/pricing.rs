//! Pricing packages
//!
//! Provides CRUD operations for the pricing packages shown alongside the
//! service catalogue.

use crate::storage::Database;
use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::Row;

fn default_currency() -> String {
    "TZS".to_string()
}

fn default_billing_period() -> String {
    "project".to_string()
}

/// Pricing package category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    #[default]
    Development,
    Research,
    Network,
}

impl PackageType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Development => "development",
            PackageType::Research => "research",
            PackageType::Network => "network",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "development" => Some(PackageType::Development),
            "research" => Some(PackageType::Research),
            "network" => Some(PackageType::Network),
            _ => None,
        }
    }
}

/// A pricing package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingPackage {
    #[serde(default = "super::new_id")]
    pub id: String,
    pub title: String,
    pub package_type: PackageType,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Billing period, e.g. "project" or "month"
    #[serde(default = "default_billing_period")]
    pub billing_period: String,
    /// One feature per line
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "super::default_true")]
    pub is_active: bool,
}

impl PricingPackage {
    /// Create a new active package priced in the default currency
    pub fn new(title: impl Into<String>, package_type: PackageType, price: f64) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            package_type,
            price,
            currency: default_currency(),
            billing_period: default_billing_period(),
            features: String::new(),
            is_featured: false,
            display_order: 0,
            is_active: true,
        }
    }

    /// Set the newline-separated feature text
    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = features.into();
        self
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

    /// Features as individual entries, split on line breaks
    pub fn features_list(&self) -> Vec<String> {
        self.features.split('\n').map(|f| f.to_string()).collect()
    }
}

/// Pricing package repository for database operations
pub struct PricingPackageRepository<'a> {
    db: &'a Database,
}

impl<'a> PricingPackageRepository<'a> {
    /// Create a new pricing package repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new pricing package in the database
    pub async fn create(&self, package: &PricingPackage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pricing_packages (id, title, package_type, price, currency,
                                          billing_period, features, is_featured,
                                          display_order, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&package.id)
        .bind(&package.title)
        .bind(package.package_type.as_str())
        .bind(package.price)
        .bind(&package.currency)
        .bind(&package.billing_period)
        .bind(&package.features)
        .bind(package.is_featured)
        .bind(package.display_order)
        .bind(package.is_active)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a pricing package by ID
    pub async fn get(&self, id: &str) -> Result<Option<PricingPackage>> {
        let row = sqlx::query(&select("WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_package))
    }

    /// List all packages, by type then display order
    pub async fn list_all(&self) -> Result<Vec<PricingPackage>> {
        let rows = sqlx::query(&select("ORDER BY package_type ASC, display_order ASC"))
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.into_iter().map(row_to_package).collect())
    }

    /// List active packages only, by type then display order
    pub async fn list_active(&self) -> Result<Vec<PricingPackage>> {
        let rows = sqlx::query(&select(
            "WHERE is_active = 1 ORDER BY package_type ASC, display_order ASC",
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(row_to_package).collect())
    }

    /// Update a pricing package
    pub async fn update(&self, package: &PricingPackage) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE pricing_packages
            SET title = ?, package_type = ?, price = ?, currency = ?, billing_period = ?,
                features = ?, is_featured = ?, display_order = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&package.title)
        .bind(package.package_type.as_str())
        .bind(package.price)
        .bind(&package.currency)
        .bind(&package.billing_period)
        .bind(&package.features)
        .bind(package.is_featured)
        .bind(package.display_order)
        .bind(package.is_active)
        .bind(&package.id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Delete a pricing package
    pub async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM pricing_packages WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Check if a pricing package exists
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM pricing_packages WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }
}

fn select(suffix: &str) -> String {
    format!(
        "SELECT id, title, package_type, price, currency, billing_period, features, \
         is_featured, display_order, is_active \
         FROM pricing_packages {suffix}"
    )
}

/// Convert a database row to a PricingPackage
fn row_to_package(row: sqlx::sqlite::SqliteRow) -> PricingPackage {
    PricingPackage {
        id: row.get("id"),
        title: row.get("title"),
        package_type: PackageType::parse(row.get("package_type")).unwrap_or_default(),
        price: row.get("price"),
        currency: row.get("currency"),
        billing_period: row.get("billing_period"),
        features: row.get("features"),
        is_featured: row.get("is_featured"),
        display_order: row.get("display_order"),
        is_active: row.get("is_active"),
    }
}
