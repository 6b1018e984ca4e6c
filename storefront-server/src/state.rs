//! Application state for storefront-server

use sqlx::PgPool;

use crate::auth::JwtService;
use crate::auth::rate_limit::RateLimiter;
use crate::config::{CapiConfig, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Bearer token validation
    pub jwt: JwtService,
    /// Rate limiter for public lookup routes
    pub rate_limiter: RateLimiter,
    /// Outbound HTTP client (Conversions API, courier API)
    pub http: reqwest::Client,
    pub capi: CapiConfig,
    /// Default courier API base URL
    pub courier_base_url: String,
}

impl AppState {
    /// Connect to the database, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Self::with_pool(pool, config)
    }

    /// Build the state around an existing pool (no migrations)
    pub fn with_pool(pool: PgPool, config: &Config) -> Result<Self, BoxError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            pool,
            jwt: JwtService::new(&config.jwt_secret, config.jwt_audience.clone()),
            rate_limiter: RateLimiter::new(config.trust_proxy_headers),
            http,
            capi: config.capi.clone(),
            courier_base_url: config.courier_base_url.clone(),
        })
    }
}
