use std::path::PathBuf;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password";
pub const DEFAULT_SERVER_SECRET: &str = "change_this_secret";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30 * 60;

/// Runtime configuration, read once at startup.
///
/// Deliberately not `Debug`: `server_secret` and `admin_password` must
/// never end up in log output.
#[derive(Clone)]
pub struct Config {
    pub admin_username: String,
    pub admin_password: String,
    pub server_secret: String,
    pub listen_addr: String,
    pub data_dir: PathBuf,
    pub sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present; ignore when absent
        let _ = dotenvy::dotenv();

        Self {
            admin_username: env_or("CV_ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
            admin_password: env_or("CV_ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            server_secret: env_or("CV_SERVER_SECRET", DEFAULT_SERVER_SECRET),
            listen_addr: env_or("CV_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
            data_dir: PathBuf::from(env_or("CV_DATA_DIR", DEFAULT_DATA_DIR)),
            sync_interval_secs: std::env::var("CV_SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS),
        }
    }

    /// Complains loudly when the shipped defaults are still in place.
    /// Values themselves are never logged.
    pub fn warn_on_insecure_defaults(&self) {
        if self.admin_username == DEFAULT_ADMIN_USERNAME
            && self.admin_password == DEFAULT_ADMIN_PASSWORD
        {
            tracing::warn!(
                "Admin credentials are the insecure defaults; set CV_ADMIN_USERNAME and CV_ADMIN_PASSWORD"
            );
        }
        if self.server_secret == DEFAULT_SERVER_SECRET {
            tracing::warn!(
                "Encryption secret is the insecure default; set CV_SERVER_SECRET before storing real API keys"
            );
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
