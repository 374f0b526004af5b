pub mod api;
pub mod api_worker;
pub mod config;
pub mod countdown;
pub mod error;
pub mod input;
pub mod logger;
pub mod models;
pub mod session;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod flow_tests;

// Re-exports for convenience
pub use api::{HttpQuizApi, QuizApi};
pub use api_worker::spawn_api_worker;
pub use config::{Config, Deployment, SessionSettings, Setup};
pub use error::{ApiError, ConfigError};
pub use input::{KeyFlow, handle_key};
pub use models::{ApiRequest, ApiResponse, Course, FinalizeResult, Question};
pub use session::{Event, Outcome, QuizController, Screen, ScreenKind};
pub use utils::calculate_wrapped_cursor_position;
