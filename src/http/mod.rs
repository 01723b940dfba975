pub mod error;
pub mod handlers;
pub mod routes;
pub mod serve;

pub use error::ApiError;
pub use routes::{build_router, AppState};
pub use serve::{serve, serve_with_shutdown};
