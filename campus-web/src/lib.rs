//! Campus Web Server
//!
//! HTTP surface for the Campus authorization core: the middleware that binds
//! requests to principals, the role and capability gates in front of
//! protected routes, and the administrative management endpoints for role
//! presets and principal grants.

pub mod gates;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::CampusServer;
pub use state::AppState;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    middleware, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the main application router
pub fn create_app(state: AppState) -> WebResult<Router> {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
        .allow_origin("http://127.0.0.1:3000".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_credentials(true)
        .allow_headers([
            AUTHORIZATION,
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-principal-id"),
        ]);

    // Create the main router. The principal-context layer is outermost so
    // every gate below it sees the attached identifier.
    Ok(Router::new()
        .nest("/api", routes::api_routes(state.clone())?)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(gates::principal_context_middleware))
        .with_state(state))
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Identifier of the bootstrap administrator principal
    pub bootstrap_admin: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            dev_mode: false,
            bootstrap_admin: "admin".to_string(),
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("CAMPUS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("CAMPUS_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            dev_mode: std::env::var("CAMPUS_DEV_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            bootstrap_admin: std::env::var("CAMPUS_BOOTSTRAP_ADMIN")
                .unwrap_or_else(|_| "admin".to_string()),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authorization error: {0}")]
    Access(#[from] campus_access::AccessError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

/// Initialize logging for the web server
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_web=debug,campus_access=debug,tower_http=debug".into()),
        )
        .init();
}
