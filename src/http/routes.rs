use crate::core::fallback::FallbackOrchestrator;
use crate::domain::ports::MailTransport;
use crate::http::handlers;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 每個請求共用的唯讀狀態
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: FallbackOrchestrator,
    pub mailer: Arc<dyn MailTransport>,
}

impl AppState {
    pub fn new(orchestrator: FallbackOrchestrator, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            orchestrator,
            mailer,
        }
    }
}

pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: AppState, cors_origin: HeaderValue) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::root).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/health",
            get(handlers::health).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate-email",
            post(handlers::generate_email)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/send-email",
            post(handlers::send_email)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
}
