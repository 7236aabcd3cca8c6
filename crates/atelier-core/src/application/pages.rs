//! Page assemblers
//!
//! Read-only query functions gathering entities for display. Each
//! assembler produces a serializable view model handed to the page
//! delivery layer; none of them mutate state.

use crate::application::errors::FieldErrors;
use crate::application::validators::ContactForm;
use crate::domain::pricing::{PricingPackage, PricingPackageRepository};
use crate::domain::projects::{Project, ProjectRepository};
use crate::domain::research::{ResearchPaper, ResearchPaperRepository};
use crate::domain::services::{Service, ServiceRepository};
use crate::domain::team::{TeamMember, TeamMemberRepository};
use crate::domain::testimonials::{Testimonial, TestimonialRepository};
use crate::storage::Database;
use crate::Result;
use serde::Serialize;

/// Landing page shows at most this many featured projects
pub const HOME_FEATURED_PROJECT_LIMIT: i64 = 6;
/// Landing page shows at most this many approved testimonials
pub const HOME_TESTIMONIAL_LIMIT: i64 = 3;

/// One-shot notice shown to the visitor after a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl Flash {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            text: text.into(),
        }
    }
}

/// Contact-form state carried into the home page: submitted values and
/// field errors after a failed validation, empty otherwise
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactFormState {
    pub values: ContactForm,
    pub errors: FieldErrors,
}

impl ContactFormState {
    /// Form state re-presenting a rejected submission
    pub fn rejected(values: ContactForm, errors: FieldErrors) -> Self {
        Self { values, errors }
    }
}

/// Landing page view model
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub services: Vec<Service>,
    pub featured_projects: Vec<Project>,
    pub testimonials: Vec<Testimonial>,
    pub team_members: Vec<TeamMember>,
    pub pricing_packages: Vec<PricingPackage>,
    pub form: ContactFormState,
    pub flash: Vec<Flash>,
}

/// Project listing view model
#[derive(Debug, Clone, Serialize)]
pub struct ProjectListPage {
    pub projects: Vec<Project>,
}

/// Research listing view model
#[derive(Debug, Clone, Serialize)]
pub struct ResearchListPage {
    pub papers: Vec<ResearchPaper>,
}

/// Assemble the landing page: active services, up to 6 featured projects,
/// up to 3 approved testimonials, active team members, and active pricing
/// packages
pub async fn assemble_home(
    db: &Database,
    form: ContactFormState,
    flash: Vec<Flash>,
) -> Result<HomePage> {
    let services = ServiceRepository::new(db).list_active().await?;
    let featured_projects = ProjectRepository::new(db)
        .list_featured(HOME_FEATURED_PROJECT_LIMIT)
        .await?;
    let testimonials = TestimonialRepository::new(db)
        .list_approved(HOME_TESTIMONIAL_LIMIT)
        .await?;
    let team_members = TeamMemberRepository::new(db).list_active().await?;
    let pricing_packages = PricingPackageRepository::new(db).list_active().await?;

    Ok(HomePage {
        services,
        featured_projects,
        testimonials,
        team_members,
        pricing_packages,
        form,
        flash,
    })
}

/// Assemble the project listing, completion date descending
pub async fn assemble_project_list(db: &Database) -> Result<ProjectListPage> {
    let projects = ProjectRepository::new(db).list_all().await?;
    Ok(ProjectListPage { projects })
}

/// Assemble the research listing: published papers only, publication date
/// descending
pub async fn assemble_research_list(db: &Database) -> Result<ResearchListPage> {
    let papers = ResearchPaperRepository::new(db).list_published().await?;
    Ok(ResearchListPage { papers })
}
