//! Request handlers

mod home;
mod projects;
mod research;

pub use home::{home, submit_contact};
pub use projects::project_list;
pub use research::research_list;
