//! Domain layer - record store entities and repositories
//!
//! One module per entity kind. Each module provides the entity struct,
//! its choice enums, and a repository over the shared [`Database`] pool
//! with the entity's default ordering and the filters the page
//! assemblers use.
//!
//! [`Database`]: crate::storage::Database

pub mod messages;
pub mod pricing;
pub mod projects;
pub mod research;
pub mod services;
pub mod team;
pub mod testimonials;

pub use messages::{Message, MessageRepository, MessageStatus};
pub use pricing::{PackageType, PricingPackage, PricingPackageRepository};
pub use projects::{create_project, Project, ProjectRepository, ProjectType};
pub use research::{PaperType, ResearchPaper, ResearchPaperRepository};
pub use services::{Service, ServiceRepository};
pub use team::{TeamMember, TeamMemberRepository};
pub use testimonials::{Testimonial, TestimonialRepository};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Fresh record identifier; also the serde default so admin JSON input
/// may omit the id
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn default_true() -> bool {
    true
}
