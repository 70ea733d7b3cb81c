use std::env;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::utils::{MAX_CODE_LEN, MIN_CODE_LEN};

/// Most rows a single batch submission may carry
pub const MAX_BATCH_SIZE: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub links: LinkConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `file` or `memory`
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Host prefix used when displaying short URLs
    #[serde(default = "default_public_host")]
    pub public_host: String,
    #[serde(default = "default_validity_mins")]
    pub default_validity_mins: u32,
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_max_generate_attempts")]
    pub max_generate_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    #[serde(default = "default_redirect_delay_ms")]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Timezone label for coarse locations; the host UTC offset when unset
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_storage_backend() -> String {
    "file".to_string()
}

fn default_data_file() -> String {
    "linkstash.json".to_string()
}

fn default_public_host() -> String {
    "http://localhost:3000".to_string()
}

fn default_validity_mins() -> u32 {
    30
}

fn default_max_batch() -> usize {
    5
}

fn default_code_length() -> usize {
    6
}

fn default_max_generate_attempts() -> usize {
    10
}

fn default_redirect_delay_ms() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_file: default_data_file(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            public_host: default_public_host(),
            default_validity_mins: default_validity_mins(),
            max_batch: default_max_batch(),
            code_length: default_code_length(),
            max_generate_attempts: default_max_generate_attempts(),
        }
    }
}

impl LinkConfig {
    /// Brings `code_length` into the short-code length range and
    /// `max_batch` into `1..=MAX_BATCH_SIZE`.
    pub fn clamped(mut self) -> Self {
        let code_length = self.code_length.clamp(MIN_CODE_LEN, MAX_CODE_LEN);
        if code_length != self.code_length {
            warn!(
                "links.code_length {} out of range, using {}",
                self.code_length, code_length
            );
            self.code_length = code_length;
        }

        let max_batch = self.max_batch.clamp(1, MAX_BATCH_SIZE);
        if max_batch != self.max_batch {
            warn!("links.max_batch {} out of range, using {}", self.max_batch, max_batch);
            self.max_batch = max_batch;
        }

        self
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
            enable_rotation: false,
            max_backups: default_max_backups(),
        }
    }
}

const CONFIG_PATHS: &[&str] = &["config.toml", "linkstash.toml", "config/linkstash.toml"];

impl Config {
    /// Load configuration from TOML with environment variable overrides
    pub fn load(path: Option<&str>) -> Self {
        let mut config = Self::load_from_file(path);
        config.override_with_env();
        config.links = config.links.clamped();
        config
    }

    fn load_from_file(path: Option<&str>) -> Self {
        if let Some(path) = path
            && !Path::new(path).exists()
        {
            warn!("Config file {} does not exist, using defaults", path);
            return Self::default();
        }

        let candidates: Vec<&str> = match path {
            Some(p) => vec![p],
            None => CONFIG_PATHS.to_vec(),
        };

        for path in candidates {
            if !Path::new(path).exists() {
                continue;
            }
            debug!("Loading config from: {}", path);
            match Self::from_file(path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config file {}: {}", path, e),
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Parse a single TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&content)?)
    }

    fn override_with_env(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT")
            && let Ok(port) = port.parse()
        {
            self.server.port = port;
        }

        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(data_file) = env::var("DATA_FILE") {
            self.storage.data_file = data_file;
        }

        if let Ok(public_host) = env::var("PUBLIC_HOST") {
            self.links.public_host = public_host;
        }
        if let Ok(mins) = env::var("DEFAULT_VALIDITY_MINS")
            && let Ok(mins) = mins.parse()
        {
            self.links.default_validity_mins = mins;
        }
        if let Ok(length) = env::var("RANDOM_CODE_LENGTH")
            && let Ok(length) = length.parse()
        {
            self.links.code_length = length;
        }

        if let Ok(delay) = env::var("REDIRECT_DELAY_MS")
            && let Ok(delay) = delay.parse()
        {
            self.redirect.delay_ms = delay;
        }

        if let Ok(tz) = env::var("LOCATION_TIMEZONE") {
            self.location.timezone = Some(tz);
        }

        if let Ok(level) = env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration from an optional explicit path.
/// Later calls are no-ops.
pub fn init_config(path: Option<&str>) -> &'static Config {
    CONFIG.get_or_init(|| Config::load(path))
}
