//! Project listing handler

use axum::extract::State;

use atelier_core::application::pages::assemble_project_list;

use crate::error::AppError;
use crate::render::RenderedPage;
use crate::state::AppState;

/// GET /projects — all projects, most recently completed first
pub async fn project_list(State(state): State<AppState>) -> Result<RenderedPage, AppError> {
    let page = assemble_project_list(&state.db).await?;
    RenderedPage::new("projects", &page)
}
