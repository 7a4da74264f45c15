use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Cache entry lifetime, measured from creation (non-sliding).
    pub cache_ttl_hours: i64,
    /// Maximum number of entity slots held by the cache backend.
    pub cache_capacity: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            cache_ttl_hours: std::env::var("CACHE_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_TTL_HOURS must be a valid number of hours"))
                .and_then(|hours: i64| {
                    if hours <= 0 {
                        anyhow::bail!("CACHE_TTL_HOURS must be positive");
                    }
                    Ok(hours)
                })?,
            cache_capacity: std::env::var("CACHE_CAPACITY")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CACHE_CAPACITY must be a valid number"))?,
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Profile cache: {}h TTL, {} slots",
            config.cache_ttl_hours,
            config.cache_capacity
        );

        Ok(config)
    }
}
