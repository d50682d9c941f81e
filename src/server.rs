//! Server runtime
//!
//! [`ServerHandle`] owns the whole lifecycle: database init, migrations,
//! demo catalog seeding, the HTTP server and graceful shutdown.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::seed::seed_demo_catalog;
use crate::infrastructure::{init_database, InMemorySessionStore};
use crate::interfaces::http::{create_router, AppState, CookieSettings};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Seed the demo catalog when it is empty. Off when either this or
    /// `catalog.seed_demo_data` is off.
    pub seed_demo_data: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed_demo_data: true,
        }
    }
}

/// The global metrics recorder can only be installed once per process,
/// so a restart within the same process reuses it.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Failed to install Prometheus metrics recorder: {}", e);
                None
            }
        })
        .clone()
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking server.
///
/// ```rust,no_run
/// use car_rental::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the HTTP server is bound to
    pub local_addr: std::net::SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    http_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the server.
    ///
    /// 1. Install the Prometheus recorder (if `server.metrics_enabled`)
    /// 2. Connect to the database and run migrations
    /// 3. Seed the demo catalog (if enabled and empty)
    /// 4. Serve HTTP until shutdown is triggered
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let cfg = opts.config;
        info!("Starting car rental service...");

        let prometheus = if cfg.server.metrics_enabled {
            prometheus_handle()
        } else {
            None
        };

        // ── Database ───────────────────────────────────────────
        let db_config = cfg.database.to_database_config();
        info!("Database: {}", db_config.url);
        let db = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&db, None).await?;
            info!("Migrations completed");
        }

        if opts.seed_demo_data && cfg.catalog.seed_demo_data && seed_demo_catalog(&db).await? {
            info!("Demo catalog seeded");
        }

        // ── Services & router ──────────────────────────────────
        let state = AppState::new(
            db.clone(),
            Arc::new(InMemorySessionStore::with_idle_timeout(Duration::from_secs(
                cfg.session.idle_timeout_secs,
            ))),
            CookieSettings {
                name: cfg.session.cookie_name.clone(),
                secure: cfg.session.secure,
            },
            cfg.security.bcrypt_cost,
        );
        let router = create_router(state, prometheus);

        // ── HTTP server ────────────────────────────────────────
        let shutdown = ShutdownCoordinator::new(cfg.server.shutdown_timeout);
        let http_shutdown = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(cfg.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let http_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            http_shutdown.wait().await;
            info!("🛑 HTTP server received shutdown signal");
        });

        let http_task = tokio::spawn(async move {
            if let Err(e) = http_server.await {
                error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            config: cfg,
            local_addr,
            db,
            shutdown,
            http_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown without waiting.
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for in-flight requests to drain (bounded by
    /// `server.shutdown_timeout`), then close the database.
    pub async fn wait(self) {
        let Self {
            db,
            shutdown,
            http_task,
            ..
        } = self;

        let drained = shutdown
            .run_with_timeout(async move {
                if let Err(e) = http_task.await {
                    error!("HTTP server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Closing with requests still in flight");
        }

        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Car rental service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down car rental service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.http_task.is_finished()
    }
}

/// Initialize tracing from the application config.
///
/// Call once at process startup. `RUST_LOG` takes precedence over
/// `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
