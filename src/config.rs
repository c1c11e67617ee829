//! Server configuration loaded from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4321;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// SQLite file (from FITLOG_DB_PATH). `None` uses the platform data directory.
    pub db_path: Option<PathBuf>,
    /// HTTP port (from FITLOG_PORT)
    pub port: u16,
    /// Allowed CORS origins (from FITLOG_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("FITLOG_DB_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let port = match lookup("FITLOG_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid FITLOG_PORT {:?}", raw);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let cors_origins = lookup("FITLOG_CORS_ORIGINS").map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            db_path,
            port,
            cors_origins,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            port: DEFAULT_PORT,
            cors_origins: None,
        }
    }
}
