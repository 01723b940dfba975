pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

pub use adapters::{GroqClient, SmtpMailTransport};
pub use config::{AppConfig, CliArgs};
pub use core::fallback::FallbackOrchestrator;
pub use http::{build_router, AppState};
pub use utils::error::{AppError, Result};
