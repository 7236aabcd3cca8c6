//! Outbound mail transport
//!
//! The submission workflow talks to a [`Mailer`] trait object so tests can
//! substitute a recording transport. The production implementation sends
//! over SMTP (see [`smtp`]).

use async_trait::async_trait;
use thiserror::Error;

pub mod smtp;

pub use smtp::SmtpMailer;

/// A composed email ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub subject: String,
    pub body: String,
    /// Envelope sender; the submission workflow puts the visitor's own
    /// address here
    pub from: String,
    /// Sole recipient
    pub to: String,
}

/// Mail dispatch errors. The two variants carry the distinction the
/// submission workflow reports to visitors: a malformed header gets a
/// fixed generic message, everything else surfaces its reason.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("invalid header in outbound mail: {0}")]
    InvalidHeader(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail transport
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Dispatch a single email. Not retried by callers.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
