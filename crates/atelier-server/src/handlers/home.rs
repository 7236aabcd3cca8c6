//! Landing page and contact submission handlers

use axum::extract::State;
use axum::Form;

use atelier_core::application::pages::{assemble_home, ContactFormState, Flash};
use atelier_core::application::submission::{
    SubmissionError, SubmissionOutcome, SubmissionWorkflow,
};
use atelier_core::application::validators::ContactForm;

use crate::error::AppError;
use crate::render::RenderedPage;
use crate::state::AppState;

const SUCCESS_TEXT: &str =
    "Your message has been sent successfully! We will get back to you soon.";

/// GET / — landing page with an empty contact form
pub async fn home(State(state): State<AppState>) -> Result<RenderedPage, AppError> {
    let page = assemble_home(&state.db, ContactFormState::default(), Vec::new()).await?;
    RenderedPage::new("index", &page)
}

/// POST / — contact form submission
///
/// Validation failures re-present the form with its field errors and the
/// submitted values; accepted submissions come back with a flash notice
/// reflecting the notify outcome.
pub async fn submit_contact(
    State(state): State<AppState>,
    Form(form): Form<ContactForm>,
) -> Result<RenderedPage, AppError> {
    let workflow = SubmissionWorkflow::new(
        &state.db,
        state.mailer.as_ref(),
        &state.config.mail.owner_address,
    );

    let (form_state, flash) = match workflow.submit(&form).await {
        Ok(SubmissionOutcome::Delivered { .. }) => {
            (ContactFormState::default(), vec![Flash::success(SUCCESS_TEXT)])
        }
        Ok(SubmissionOutcome::NotifyFailed { failure, .. }) => (
            ContactFormState::default(),
            vec![Flash::error(failure.visitor_message())],
        ),
        Err(SubmissionError::Invalid(errors)) => {
            (ContactFormState::rejected(form, errors), Vec::new())
        }
        Err(SubmissionError::Store(error)) => return Err(AppError::Internal(error)),
    };

    let page = assemble_home(&state.db, form_state, flash).await?;
    RenderedPage::new("index", &page)
}
