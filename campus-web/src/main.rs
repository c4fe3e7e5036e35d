//! Campus Web Server
//!
//! Role and permission based authorization service for the Campus platform.

use campus_web::server::CampusServerBuilder;
use campus_web::{init_logging, WebConfig};
use clap::Parser;

/// Campus Web Server - role and permission based authorization service
#[derive(Parser)]
#[command(name = "campus-web")]
#[command(about = "Authorization service for the Campus platform")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable development mode
    #[arg(long)]
    dev: bool,

    /// Identifier of the bootstrap administrator principal
    #[arg(long)]
    bootstrap_admin: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging first
    std::env::set_var(
        "RUST_LOG",
        format!(
            "campus_web={},campus_access={},tower_http=debug",
            args.log_level, args.log_level
        ),
    );
    init_logging();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Create web configuration
    let mut config = WebConfig::from_env();

    // Override with command line arguments
    config.host = args.host;
    config.port = args.port;
    config.dev_mode = args.dev;
    if let Some(bootstrap_admin) = args.bootstrap_admin {
        config.bootstrap_admin = bootstrap_admin;
    }

    // Print startup information
    println!("🚀 Starting Campus Web Server");
    println!("📍 Server: http://{}:{}", config.host, config.port);
    println!("🔧 Development mode: {}", config.dev_mode);
    println!("👤 Bootstrap administrator: {}", config.bootstrap_admin);

    // Build and start the server
    let server = match CampusServerBuilder::new()
        .host(config.host.clone())
        .port(config.port)
        .dev_mode(config.dev_mode)
        .bootstrap_admin(config.bootstrap_admin.clone())
        .build()
        .await
    {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Failed to build server: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server (this will block until shutdown)
    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed to start: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        use clap::Parser;

        // Test default values
        let args = Args::parse_from(&["campus-web"]);
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8080);
        assert!(!args.dev);
        assert!(args.bootstrap_admin.is_none());

        // Test custom values
        let args = Args::parse_from(&[
            "campus-web",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--dev",
            "--bootstrap-admin",
            "root",
        ]);
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 3000);
        assert!(args.dev);
        assert_eq!(args.bootstrap_admin.as_deref(), Some("root"));
    }
}
