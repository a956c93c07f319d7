//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.

// region: --- Imports
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use lib_auth::RateLimiter;
use lib_core::{create_pool, init_schema, AdminPolicy, Config, DbPool, SessionService};
use lib_utils::{get_env_or, get_env_parse_or};
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req, RequestStamp};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub sessions: Arc<SessionService>,
    pub limiter: RateLimiter,
    pub admin: Arc<AdminPolicy>,
}

impl AppState {
    /// Wire the services over an existing pool with the in-memory limiter.
    pub fn new(db: DbPool, config: Config) -> lib_core::Result<Self> {
        Self::with_limiter(db, config, RateLimiter::in_memory())
    }

    /// Wire the services with an explicitly chosen limiter store.
    pub fn with_limiter(db: DbPool, config: Config, limiter: RateLimiter) -> lib_core::Result<Self> {
        let sessions = Arc::new(SessionService::new(db.clone(), &config)?);
        let admin = Arc::new(AdminPolicy::from_config(&config));

        Ok(Self {
            db,
            config,
            sessions,
            limiter,
            admin,
        })
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<SessionService> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for RateLimiter {
    fn from_ref(state: &AppState) -> Self {
        state.limiter.clone()
    }
}

impl FromRef<AppState> for Arc<AdminPolicy> {
    fn from_ref(state: &AppState) -> Self {
        state.admin.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Interval between purges of expired rate-limit windows
    pub purge_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            purge_interval: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `BIND_ADDRESS`, `ALLOWED_ORIGINS` (comma separated)
    /// and `RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_address = get_env_or("BIND_ADDRESS", &defaults.bind_address);

        let allowed_origins = match lib_utils::get_env("ALLOWED_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.allowed_origins,
        };

        let purge_secs: u64 = get_env_parse_or("RATE_LIMIT_WINDOW_SECS", defaults.purge_interval.as_secs())
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            bind_address,
            allowed_origins,
            purge_interval: Duration::from_secs(purge_secs.max(1)),
        })
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// `LOG_LEVEL` as a known level name, `info` when unset, blank or unknown.
fn log_level() -> String {
    let level = get_env_or("LOG_LEVEL", "info").trim().to_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info".to_string(),
    }
}

/// Install the global tracing subscriber, filtered by `LOG_LEVEL`.
pub fn init_tracing() -> anyhow::Result<()> {
    let log_level = log_level();
    let filter = tracing_subscriber::EnvFilter::new(&log_level);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global tracing subscriber: {e}"))?;

    info!(" Log level: {}", log_level);
    Ok(())
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails (missing `JWT_SECRET`, ...)
/// - Database connection or schema bootstrap fails
/// - Server binding fails
pub async fn start_server(server_config: ServerConfig) -> anyhow::Result<()> {
    info!(" PROPOSAL DESK BACKEND STARTING");

    info!("Loading configuration...");
    let config = Config::from_env()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    ensure_sqlite_dir(&config.database_url)?;

    info!("Connecting to database...");
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;
    info!(" Schema ready");

    let state = AppState::new(pool, config)?;
    if !state.admin.is_enabled() {
        info!(" ADMIN_ENABLE_SECRET not set, admin promotion disabled");
    }

    spawn_limiter_purge(state.limiter.clone(), server_config.purge_interval);

    let app = create_router(state, &server_config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&server_config.bind_address).await?;
    info!(" SERVER READY: http://{}", server_config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_sqlite_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let db_path = db_path.trim_start_matches("//");
    if db_path.starts_with(":memory:") {
        return Ok(());
    }

    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            info!("Created database directory: {:?}", parent);
        }
    }
    Ok(())
}

/// Periodically drop expired rate-limit windows.
fn spawn_limiter_purge(limiter: RateLimiter, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired().await;
            if purged > 0 {
                debug!("[RATE LIMIT] Purged {} expired windows", purged);
            }
        }
    });
}

/// Create the main application router with all routes
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(handlers::admin::ADMIN_SECRET_HEADER),
        ]);

    let protected = Router::new()
        .route("/api/me", get(handlers::me::me))
        .route(
            "/api/company",
            get(handlers::company::get_company).post(handlers::company::save_company),
        )
        .route(
            "/api/proposals",
            get(handlers::proposals::list_proposals).post(handlers::proposals::create_proposal),
        )
        .route("/api/proposals/{id}", get(handlers::proposals::get_proposal))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    debug!("[ROUTE SETUP] Registering HTTP routes...");
    Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/admin/promote", post(handlers::admin::promote))
        .merge(protected)
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            debug!("[404 HANDLER] Unmatched route - returning 404");
            (StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        // Outermost, so the logging and trace layers see the stamp
        .layer(from_fn(stamp_req))
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!(" AUTH:");
    info!("   • POST /api/auth/register");
    info!("   • POST /api/auth/login");
    info!("   • POST /api/auth/logout");
    info!(" ACCOUNT (session cookie):");
    info!("   • GET  /api/me");
    info!("   • GET  /api/company");
    info!("   • POST /api/company");
    info!("   • GET  /api/proposals");
    info!("   • POST /api/proposals");
    info!("   • GET  /api/proposals/{{id}}");
    info!(" ADMIN:");
    info!("   • POST /api/admin/promote (x-admin-secret)");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
