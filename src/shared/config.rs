use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub resolver: ResolverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Also refuse when the other user has blocked the caller.
    #[serde(default)]
    pub check_reverse_blocks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/kindred.db".to_string(),
            max_connections: 5,
            connection_timeout: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "kindred=debug,info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("KINDRED_DATABASE_URL")
            && !v.trim().is_empty()
        {
            cfg.database.url = v.trim().to_string();
        }
        if let Some(v) = lookup("KINDRED_DATABASE_MAX_CONNECTIONS")
            && let Some(value) = parse_u32(&v)
        {
            cfg.database.max_connections = value.max(1);
        }
        if let Some(v) = lookup("KINDRED_DATABASE_CONNECTION_TIMEOUT")
            && let Some(value) = parse_u64(&v)
        {
            cfg.database.connection_timeout = value.max(1);
        }
        if let Some(v) = lookup("KINDRED_CHECK_REVERSE_BLOCKS") {
            cfg.resolver.check_reverse_blocks =
                parse_bool(&v, cfg.resolver.check_reverse_blocks);
        }
        if let Some(v) = lookup("KINDRED_LOG_FILTER")
            && !v.trim().is_empty()
        {
            cfg.logging.filter = v.trim().to_string();
        }
        if let Some(v) = lookup("KINDRED_LOG_JSON") {
            cfg.logging.json = parse_bool(&v, cfg.logging.json);
        }

        cfg
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse().ok()
}
