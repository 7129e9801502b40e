//! Derived state for a daily wellness log: build the canonical entry for a
//! day from stored rows, apply user actions to it, and derive the Today and
//! History view models, KPI cards and insights shown by the app.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod format;
pub mod models;
pub mod selectors;
pub mod services;
pub mod telemetry;

pub use config::TrackerConfig;
pub use error::{AppError, AppResult};
pub use models::entry::DailyEntry;
pub use services::optimistic::OptimisticCache;
