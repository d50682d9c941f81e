//! Car rental booking service, CLI server
//!
//! ```sh
//! # Run with default config (~/.config/car-rental/config.toml)
//! car-rental
//!
//! # Custom config path
//! car-rental --config /etc/car-rental/config.toml
//!
//! # Override the port
//! car-rental --port 8080
//!
//! # Validate config without starting
//! car-rental --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use car_rental::config::AppConfig;
use car_rental::server::{init_tracing, ServerHandle, ServerOptions};

/// Car rental booking service.
#[derive(Parser, Debug)]
#[command(
    name = "car-rental",
    version,
    about = "Car rental booking web service",
    long_about = "Car rental booking service: signup/login, a five-step booking wizard \
                  and reservation management over HTTP.\n\n\
                  Default config: ~/.config/car-rental/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CAR_RENTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Do not seed the demo catalog.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ───────────────────────────────────
    let config_path = cli.config.unwrap_or_else(car_rental::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("❌ Invalid configuration in {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ──────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ───────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    // ── Start server ─────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_demo_data: !cli.no_seed,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
