use anyhow::Context;
use clap::Parser;
use nexin_api::{ApiConfig, RestApi};
use nexin_catalog::{CatalogConfig, ModelManager, SupabaseCatalog};
use nexin_core::RecommendConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Content-based product recommendation service
#[derive(Parser, Debug)]
#[command(name = "nexin")]
#[command(about = "Content-based product recommendation service", long_about = None)]
struct Args {
    /// Catalog (Supabase) base URL
    #[arg(long, env = "SUPABASE_URL")]
    catalog_url: String,

    /// Catalog access key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    catalog_key: String,

    /// Secret expected in X-ADMIN-TOKEN for /reload
    #[arg(long, env = "ADMIN_RELOAD_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,

    /// HTTP API port
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Catalog fetch timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT_SECS", default_value_t = 30)]
    fetch_timeout_secs: u64,

    /// Number of recommendations returned
    #[arg(long, env = "RECOMMEND_TOP_N", default_value_t = 5)]
    top_n: usize,

    /// Maximum number of cached recommendation lists
    #[arg(long, env = "RECOMMEND_CACHE_CAPACITY", default_value_t = 5000)]
    cache_capacity: usize,

    /// Allowed CORS origins (any origin when empty)
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Nexin v{}", env!("CARGO_PKG_VERSION"));

    let catalog_config = CatalogConfig::new(args.catalog_url, args.catalog_key)
        .with_timeout(Duration::from_secs(args.fetch_timeout_secs));
    let catalog = SupabaseCatalog::new(catalog_config).context("catalog misconfigured")?;
    info!("Catalog: {}", catalog.config().base_url);

    if args.admin_token.is_none() {
        warn!("ADMIN_RELOAD_TOKEN not set: /reload will reject every request");
    }

    let recommend_config = RecommendConfig {
        top_n: args.top_n,
        ..Default::default()
    };
    let manager = Arc::new(ModelManager::new(
        Arc::new(catalog),
        recommend_config,
        args.cache_capacity,
    ));

    if !manager.rebuild().await {
        warn!("Initial model build failed; serving empty recommendations until /reload succeeds");
    }

    let api_config = ApiConfig {
        port: args.port,
        admin_token: args.admin_token,
        cors_origins: args.cors_origins,
    };

    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(manager, api_config).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("Nexin started successfully");
    info!("HTTP API: http://localhost:{}/", args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
