//! Pickup backend gateway entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pickup_backend::api::{create_router, AppState};
use pickup_backend::config::Config;
use pickup_backend::metrics;
use pickup_backend::upstream::{self, MlClient};
use pickup_backend::utils::shutdown_signal;

/// Pickup backend gateway.
#[derive(Parser, Debug)]
#[command(name = "pickup-backend")]
#[command(about = "HTTP gateway in front of the pickup ML service")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP server port (overrides PORT from the environment).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the gateway server (default).
    Run {
        /// HTTP server port (overrides PORT from the environment).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Check connectivity to the ML service.
    CheckUpstream,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("pickup_backend=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::CheckUpstream) => cmd_check_upstream().await,
        Some(Command::Run { port }) => cmd_run(port).await,
        None => cmd_run(args.port).await,
    }
}

/// Run the gateway server.
async fn cmd_run(port_override: Option<u16>) -> anyhow::Result<()> {
    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    // Override with CLI args if provided
    if let Some(port) = port_override {
        config.port = port;
    }

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Environment: {}", config.app_env);
    info!("ML service URL: {}", config.ml_service_url);
    info!("Upstream timeout: {}s", config.upstream_timeout_secs);
    info!("Probe timeout: {}s", config.probe_timeout_secs);

    let port = config.port;

    // Create app state
    let app_state = AppState::new(config);

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    let router = create_router(app_state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PICKUP BACKEND - CONFIGURATION CHECK");
    println!("======================================================================");

    // Load configuration
    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    // Validate configuration
    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    // Show configuration summary
    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Environment: {}", config.app_env);
    println!("  ML Service URL: {}", config.ml_service_url);
    println!("  Port: {}", config.port);
    println!("  Upstream Timeout: {}s", config.upstream_timeout_secs);
    println!("  Probe Timeout: {}s", config.probe_timeout_secs);
    println!("  Log Level: {}", config.rust_log);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Check connectivity to the ML service.
async fn cmd_check_upstream() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PICKUP BACKEND - UPSTREAM CHECK");
    println!("======================================================================");

    // Load configuration
    let config = Config::load()?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    println!("ML Service URL: {}", config.ml_service_url);
    println!("======================================================================");

    // Create client
    print!("\n1. Creating client... ");
    let client = MlClient::new(&config);
    println!("OK");

    // Probe the health endpoint
    print!("\n2. Probing ML service health... ");
    let probe = upstream::check_health(
        client.http(),
        client.base_url(),
        client.probe_timeout(),
    )
    .await;
    println!("{}", probe.status.to_string().to_uppercase());
    println!("   Details: {}", probe.details);

    // Request a prediction
    print!("\n3. Requesting a prediction... ");
    match client.fetch_prediction().await {
        Ok(prediction) => {
            println!("OK");
            println!("   Prediction: {}", prediction);
        }
        Err(e) => {
            println!("FAILED");
            println!("   Error: {}", e);
        }
    }

    println!("\n======================================================================");
    println!("UPSTREAM CHECK COMPLETED");
    println!("======================================================================");

    Ok(())
}
