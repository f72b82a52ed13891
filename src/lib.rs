pub mod ai;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use ai::{AiService, GeminiClient};
pub use api::{router, AppState};
pub use config::AppConfig;
pub use db::CatalogStore;
pub use error::{AiError, AppError};
pub use service::{AssessmentService, SemanticMatcher, TenderService};
