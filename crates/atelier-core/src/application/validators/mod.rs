//! Input validators
//!
//! Validates visitor-submitted form input before anything is persisted.

pub mod contact;

pub use contact::{ContactForm, ContactSubmission, ContactValidator};
