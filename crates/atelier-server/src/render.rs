//! Page delivery boundary
//!
//! Handlers produce a named template plus a mapping of named values; the
//! actual HTML rendering is an external collaborator. The response
//! serializes that pair as JSON.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::AppError;

/// A page ready for delivery: template name plus its context mapping
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub template: &'static str,
    pub context: serde_json::Value,
}

impl RenderedPage {
    /// Pair a template name with a serializable context
    pub fn new(template: &'static str, context: &impl Serialize) -> Result<Self, AppError> {
        Ok(Self {
            template,
            context: serde_json::to_value(context)?,
        })
    }
}

impl IntoResponse for RenderedPage {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
