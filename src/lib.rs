//! Palco - Sound & Lighting Equipment Tracking
//!
//! REST JSON API for an events-production organization: equipment registry,
//! event planning gated on checklist validation, and a three-party custody
//! transfer workflow.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod workflow;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub pool: sqlx::PgPool,
}
