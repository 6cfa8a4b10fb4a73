//! Data models for the site backend.
//!
//! Field names serialize in camelCase to match what the front end reads.

mod contact;
mod post;
mod project;

pub use contact::*;
pub use post::*;
pub use project::*;
