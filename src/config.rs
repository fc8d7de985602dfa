use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://bookings.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// SQLite URL. The file is created on first start.
    pub database_url: String,
    /// Set via BOOKING_DB_MAX_CONNECTIONS. Default: 5.
    pub max_connections: u32,
    /// Maximum accepted request body size in bytes.
    /// Set via BOOKING_BODY_LIMIT_BYTES. Default: 1 MiB.
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    Ok(from_lookup(|key| std::env::var(key).ok()))
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
    Config {
        port: lookup("BOOKING_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT),
        database_url: lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
        max_connections: lookup("BOOKING_DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        body_limit_bytes: lookup("BOOKING_BODY_LIMIT_BYTES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
    }
}
