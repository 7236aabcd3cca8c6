//! Research listing handler

use axum::extract::State;

use atelier_core::application::pages::assemble_research_list;

use crate::error::AppError;
use crate::render::RenderedPage;
use crate::state::AppState;

/// GET /research — published papers, most recently published first
pub async fn research_list(State(state): State<AppState>) -> Result<RenderedPage, AppError> {
    let page = assemble_research_list(&state.db).await?;
    RenderedPage::new("research", &page)
}
