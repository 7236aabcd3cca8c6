//! Atelier Core Library
//!
//! Shared core for the Atelier portfolio site backend: the record store
//! entities and repositories, the contact submission workflow, the page
//! assemblers, and the administrative bindings used by both the HTTP
//! server and the admin CLI.

pub mod admin;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod mail;
pub mod storage;

pub use error::{Error, Result};
