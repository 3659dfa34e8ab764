//! Tubely API Library
//!
//! HTTP handlers, authentication, the upload pipeline service and application setup.

mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use setup::routes::setup_routes;
pub use state::AppState;
