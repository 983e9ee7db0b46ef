use serde::Deserialize;

use crate::application::pagination::DEFAULT_PAGE_SIZE;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 20;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Posts per page for every listing.
    pub page_size: usize,
    /// Lifetime of the cached home listing.
    pub cache_ttl_seconds: u64,
    pub media_root: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let page_size = std::env::var("PAGE_SIZE")
            .unwrap_or_else(|_| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PAGE_SIZE: {}", e))?;
        let cache_ttl_seconds = std::env::var("CACHE_TTL_SECONDS")
            .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECONDS.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid CACHE_TTL_SECONDS: {}", e))?;
        let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into());

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            page_size,
            cache_ttl_seconds,
            media_root,
        })
    }
}
