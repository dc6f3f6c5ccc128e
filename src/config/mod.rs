use crate::errors::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

pub mod check; // use submodule at src/config/check.rs

/// How the server learns who is calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Signed bearer tokens issued by `/auth/login` and `/auth/register`.
    Token,
    /// Legacy scheme: trust `x-user-id`, `x-user-name`, `x-user-email`.
    Headers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_auth_mode")]
    pub mode: AuthMode,
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_max_idle")]
    pub max_idle: usize,
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

fn default_auth_mode() -> AuthMode {
    AuthMode::Token
}
fn default_token_ttl() -> i64 {
    24
}
fn default_max_idle() -> usize {
    8
}
fn default_busy_timeout() -> u64 {
    5_000
}
fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    4000
}
fn default_log_filter() -> String {
    "info,tower_http=info".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: default_auth_mode(),
            secret: String::new(),
            token_ttl_hours: default_token_ttl(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: default_max_idle(),
            busy_timeout_ms: default_busy_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            bind_address: default_bind_address(),
            port: default_port(),
            cors_origins: Vec::new(),
            log_filter: default_log_filter(),
            auth: AuthConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var("COMMUNITYBOARD_HOME") {
            return PathBuf::from(custom);
        }
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("communityboard")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".communityboard")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("communityboard.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("communityboard.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// Environment overrides are applied on top.
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let mut cfg = if path.exists() {
            Self::load_from(&path)?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        let cfg = serde_yaml::from_str(&content)?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(port) = try_env("COMMUNITYBOARD_PORT") {
            self.port = port;
        }
        if let Some(bind) = try_env::<String>("COMMUNITYBOARD_BIND") {
            self.bind_address = bind;
        }
        if let Some(secret) = try_env::<String>("COMMUNITYBOARD_SECRET") {
            self.auth.secret = secret;
        }
    }

    /// Write the configuration as YAML to `path`.
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let mut config = if Self::config_file().exists() {
            Self::load_from(&Self::config_file()).unwrap_or_default()
        } else {
            Config::default()
        };
        config.database = db_path.to_string_lossy().to_string();
        if config.auth.secret.is_empty() {
            config.auth.secret = generate_secret();
        }

        // Write config file
        if !is_test {
            config
                .save_to(&Self::config_file())
                .map_err(|e| io::Error::other(e.to_string()))?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}

/// 32 random bytes, base64url encoded. Used as the signing key for session tokens.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn try_env<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => {
            info!("{key} set from environment");
            Some(v)
        }
        Err(e) => {
            warn!("Invalid {key} value: {e}, ignoring");
            None
        }
    }
}
