// src/config.rs
use crate::utils::password;
use log::{error, warn};
use std::env;
use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:4000";
const DEFAULT_STORAGE_PATH: &str = "./storage";
const DEFAULT_JWT_SECRET: &str = "icebreaker_dev_secret_key";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub storage_path: String,
    pub jwt_secret: String,
    pub admin_username: String,
    // bcrypt hash; login is refused when unset
    pub admin_password_hash: Option<String>,
    pub store_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            storage_path: DEFAULT_STORAGE_PATH.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            admin_username: "admin".to_string(),
            admin_password_hash: None,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

impl AppConfig {
    // Build configuration from environment variables (after dotenv has run)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("⚠️ JWT_SECRET not set, using the development secret");
            defaults.jwt_secret.clone()
        });

        let admin_password_hash = match (env::var("ADMIN_PASSWORD_HASH"), env::var("ADMIN_PASSWORD")) {
            (Ok(hash), _) => Some(hash),
            (Err(_), Ok(plain)) => match password::hash_password(&plain) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    error!("❌ Failed to hash ADMIN_PASSWORD: {}", e);
                    None
                }
            },
            _ => {
                warn!("⚠️ No admin password configured, admin login is disabled");
                None
            }
        };

        let store_timeout = env::var("STORE_TIMEOUT_MS")
            .ok()
            .and_then(|raw| match raw.parse::<u64>() {
                Ok(ms) => Some(Duration::from_millis(ms)),
                Err(_) => {
                    warn!("⚠️ Ignoring invalid STORE_TIMEOUT_MS: {}", raw);
                    None
                }
            })
            .unwrap_or(defaults.store_timeout);

        let mut allowed_origins = match env::var("ALLOWED_ORIGINS") {
            Ok(raw) => parse_origins(&raw),
            Err(_) => defaults.allowed_origins.clone(),
        };
        if let Ok(frontend) = env::var("FRONTEND_URL_BASE") {
            allowed_origins.extend(parse_origins(&frontend));
        }

        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            storage_path: env::var("STORAGE_PATH").unwrap_or(defaults.storage_path),
            jwt_secret,
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password_hash,
            store_timeout,
            allowed_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
