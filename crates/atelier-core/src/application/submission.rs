//! Contact submission workflow
//!
//! Runs validate → persist → notify → acknowledge for one contact-form
//! submission. The message record is written before notification and is
//! never rolled back: a submission stays durable even when the owner
//! notification fails. The record moves `new → read` only when the
//! dispatch succeeds.

use crate::application::errors::FieldErrors;
use crate::application::validators::{ContactForm, ContactSubmission, ContactValidator};
use crate::domain::messages::{Message, MessageRepository, MessageStatus};
use crate::domain::services::{Service, ServiceRepository};
use crate::mail::{MailError, Mailer, OutboundEmail};
use crate::storage::Database;
use thiserror::Error;
use tracing::{info, warn};

/// Placeholder for absent optional contact fields in the owner email
const NOT_PROVIDED: &str = "Not provided";
const NOT_SPECIFIED: &str = "Not specified";

/// Submission rejected before anything was persisted
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Field-level validation failure; the form must be re-presented
    #[error("invalid submission: {0}")]
    Invalid(FieldErrors),

    /// Record store failure
    #[error(transparent)]
    Store(#[from] crate::Error),
}

/// Why the owner notification was not delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyFailure {
    /// A header could not be built from the submitted values; reported
    /// with a fixed generic message, never the raw detail
    InvalidHeader,
    /// Any other transport failure, reported with its reason
    Transport(String),
}

impl NotifyFailure {
    /// The visitor-facing error text
    pub fn visitor_message(&self) -> String {
        match self {
            NotifyFailure::InvalidHeader => "Invalid header found.".to_string(),
            NotifyFailure::Transport(reason) => {
                format!("There was an error sending your message: {reason}")
            }
        }
    }
}

/// Outcome of an accepted (persisted) submission
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Notification dispatched; the record was marked read
    Delivered { message: Message },
    /// Notification failed; the record stays at `new`
    NotifyFailed {
        message: Message,
        failure: NotifyFailure,
    },
}

impl SubmissionOutcome {
    /// The persisted message, whatever the notify outcome
    pub fn message(&self) -> &Message {
        match self {
            SubmissionOutcome::Delivered { message } => message,
            SubmissionOutcome::NotifyFailed { message, .. } => message,
        }
    }
}

/// Orchestrates a single contact-form submission
pub struct SubmissionWorkflow<'a> {
    db: &'a Database,
    mailer: &'a dyn Mailer,
    /// Site-owner address receiving contact notifications
    owner_address: &'a str,
}

impl<'a> SubmissionWorkflow<'a> {
    pub fn new(db: &'a Database, mailer: &'a dyn Mailer, owner_address: &'a str) -> Self {
        Self {
            db,
            mailer,
            owner_address,
        }
    }

    /// Run the workflow for one raw form submission
    pub async fn submit(&self, form: &ContactForm) -> Result<SubmissionOutcome, SubmissionError> {
        // 1. Validate; nothing is persisted for an invalid form
        let submission = ContactValidator::validate(form).map_err(SubmissionError::Invalid)?;
        let service = self.resolve_service(&submission).await?;

        // 2. Persist with status `new` and an immutable received timestamp
        let mut message = Message::new(
            &submission.name,
            &submission.email,
            &submission.subject,
            &submission.message,
        );
        if let Some(phone) = &submission.phone {
            message = message.with_phone(phone);
        }
        if let Some(company) = &submission.company {
            message = message.with_company(company);
        }
        if let Some(service) = &service {
            message = message.with_service(&service.id);
        }
        if let Some(budget) = submission.budget {
            message = message.with_budget(budget);
        }

        let repo = MessageRepository::new(self.db);
        repo.create(&message).await.map_err(SubmissionError::Store)?;
        info!(message_id = %message.id, "Stored contact message");

        // 3. Notify the site owner, sending as the visitor's own address
        let service_title = service.as_ref().map(|s| s.title.as_str());
        let email = compose_notification(&submission, service_title, self.owner_address);

        // 4. Mark read only if the send succeeded; the record itself is
        //    kept regardless
        match self.mailer.send(&email).await {
            Ok(()) => {
                repo.set_status(&message.id, MessageStatus::Read)
                    .await
                    .map_err(SubmissionError::Store)?;
                message.status = MessageStatus::Read;
                info!(message_id = %message.id, "Contact notification delivered");
                Ok(SubmissionOutcome::Delivered { message })
            }
            Err(MailError::InvalidHeader(reason)) => {
                warn!(message_id = %message.id, %reason, "Contact notification rejected: invalid header");
                Ok(SubmissionOutcome::NotifyFailed {
                    message,
                    failure: NotifyFailure::InvalidHeader,
                })
            }
            Err(MailError::Transport(reason)) => {
                warn!(message_id = %message.id, %reason, "Contact notification failed");
                Ok(SubmissionOutcome::NotifyFailed {
                    message,
                    failure: NotifyFailure::Transport(reason),
                })
            }
        }
    }

    /// Resolve the submitted service reference against the record store
    async fn resolve_service(
        &self,
        submission: &ContactSubmission,
    ) -> Result<Option<Service>, SubmissionError> {
        let Some(service_id) = &submission.service_id else {
            return Ok(None);
        };

        match ServiceRepository::new(self.db)
            .get(service_id)
            .await
            .map_err(SubmissionError::Store)?
        {
            Some(service) => Ok(Some(service)),
            None => {
                let mut errors = FieldErrors::new();
                errors.add("service", "Select a valid service.");
                Err(SubmissionError::Invalid(errors))
            }
        }
    }
}

/// Compose the owner notification for a validated submission
fn compose_notification(
    submission: &ContactSubmission,
    service_title: Option<&str>,
    owner_address: &str,
) -> OutboundEmail {
    let budget = submission.budget.map(|b| b.to_string());

    let body = format!(
        "Name: {name}\n\
         Email: {email}\n\
         Company: {company}\n\
         Phone: {phone}\n\
         Service: {service}\n\
         Budget: {budget}\n\
         \n\
         Message:\n\
         {message}\n",
        name = submission.name,
        email = submission.email,
        company = submission.company.as_deref().unwrap_or(NOT_PROVIDED),
        phone = submission.phone.as_deref().unwrap_or(NOT_PROVIDED),
        service = service_title.unwrap_or(NOT_SPECIFIED),
        budget = budget.as_deref().unwrap_or(NOT_SPECIFIED),
        message = submission.message,
    );

    OutboundEmail {
        subject: format!("New Contact Form Submission: {}", submission.subject),
        body,
        from: submission.email.clone(),
        to: owner_address.to_string(),
    }
}
