use crate::error::ApiError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DB_PATH: &str = "emergency_portal.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
}

impl ApiConfig {
    /// Reads `MEDISYNC_API_ADDR` and `MEDISYNC_DB_PATH`, falling back to the
    /// defaults when a variable is unset.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let raw_addr = lookup("MEDISYNC_API_ADDR").unwrap_or_else(|| DEFAULT_ADDR.into());
        let addr = raw_addr
            .parse()
            .map_err(|e| ApiError::Config(format!("MEDISYNC_API_ADDR={raw_addr}: {e}")))?;
        let db_path = lookup("MEDISYNC_DB_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into());
        Ok(Self {
            addr,
            db_path: PathBuf::from(db_path),
        })
    }
}
