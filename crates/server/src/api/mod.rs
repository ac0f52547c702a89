// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Each submodule handles a specific resource type.

pub mod assignments;
pub mod common;
pub mod error;
pub mod notes;
pub mod subjects;
pub mod tasks;

// Re-export common types
pub use common::{ErrorResponse, ListResponse};
pub use error::ApiError;
