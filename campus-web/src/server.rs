//! Campus Web Server
//!
//! Main web server implementation using Axum.

use crate::{create_app, AppState, WebConfig, WebError, WebResult};
use axum::serve;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Main Campus web server
pub struct CampusServer {
    config: WebConfig,
    state: AppState,
}

impl CampusServer {
    /// Create a new Campus server
    pub async fn new(config: WebConfig) -> WebResult<Self> {
        let state = AppState::new(config.clone()).await?;

        Ok(Self { config, state })
    }

    /// Start the web server
    pub async fn start(self) -> WebResult<()> {
        let address = self.config.address();

        info!("🚀 Starting Campus Web Server");
        info!("📍 Server address: http://{}", address);
        info!("🔧 Development mode: {}", self.config.dev_mode);

        // Create the application; capability declarations are validated here
        let app = create_app(self.state.clone())?;

        // Create TCP listener
        let listener = TcpListener::bind(&address)
            .await
            .map_err(WebError::Server)?;

        info!("✅ Server listening on http://{}", address);

        // Start the server
        if let Err(e) = serve(listener, app).await {
            error!("❌ Server error: {}", e);
            return Err(WebError::Server(e));
        }

        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Builder for CampusServer
pub struct CampusServerBuilder {
    config: WebConfig,
}

impl CampusServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self {
            config: WebConfig::default(),
        }
    }

    /// Set the server host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable development mode
    pub fn dev_mode(mut self, dev_mode: bool) -> Self {
        self.config.dev_mode = dev_mode;
        self
    }

    /// Set the bootstrap administrator identifier
    pub fn bootstrap_admin<S: Into<String>>(mut self, bootstrap_admin: S) -> Self {
        self.config.bootstrap_admin = bootstrap_admin.into();
        self
    }

    /// Build the server
    pub async fn build(self) -> WebResult<CampusServer> {
        CampusServer::new(self.config).await
    }
}

impl Default for CampusServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
