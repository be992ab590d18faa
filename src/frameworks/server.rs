use crate::domain::ports::CheckinStore;
use crate::frameworks::config::{Backend, Config, ConfigError};
use crate::frameworks::db;
use crate::interface_adapters::roster::CsvFileRoster;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::stores::{
    InMemoryCheckinStore, PostgresCheckinStore, RedisCheckinStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid database url: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid redis url: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Wire the configured backend and roster into shared handler state.
pub async fn build_state(config: Config) -> Result<AppState, StartupError> {
    let store: Option<Arc<dyn CheckinStore>> = match &config.backend {
        Some(Backend::Postgres { database_url }) => {
            let pool = db::connect_pool(database_url)?;
            // A down database must not stop startup; requests report the store error.
            if let Err(err) = db::run_migrations(&pool).await {
                tracing::warn!(error = %err, "migrations not applied; check-in table may be missing");
            }
            Some(Arc::new(PostgresCheckinStore { db: pool }))
        }
        Some(Backend::Redis { redis_url }) => {
            let client = redis::Client::open(redis_url.as_str())?;
            Some(Arc::new(RedisCheckinStore::new(client)))
        }
        Some(Backend::Memory) => Some(Arc::new(InMemoryCheckinStore::default())),
        None => None,
    };

    if config.auth_secret.is_none() {
        tracing::warn!("AUTH_SECRET is not set; every guarded request will fail");
    }

    let roster = Arc::new(CsvFileRoster {
        path: config.roster_path.clone(),
    });

    Ok(AppState {
        config: Arc::new(config),
        store,
        roster,
    })
}

// Serve the check-in routes on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), StartupError> {
    axum::serve(listener, app(state))
        .await
        .map_err(StartupError::Serve)
}

pub async fn run() -> Result<(), StartupError> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = build_state(config).await?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, "listening");

    serve(listener, state).await
}
