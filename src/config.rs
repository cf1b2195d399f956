use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_SERVER_TIMEOUT_SECS: u64 = 90;
const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the import API
    #[arg(long, env = "NEXT_PUBLIC_API_BASE")]
    pub api_base: Option<String>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
    pub max_upload_bytes: usize,
    pub timeout_disabled: bool,
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: DEFAULT_HOST.to_string(),
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            timeout_disabled: false,
            timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Root of the import API. Required at startup.
    #[serde(default)]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    #[serde(default)]
    pub json: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layer defaults, config file, `OFITEC_` environment and CLI flags.
    ///
    /// Priority: CLI flag > CLI env var > `OFITEC_*` env > config file > defaults.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", DEFAULT_PORT)?
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.static_dir", DEFAULT_STATIC_DIR)?
            .set_default("server.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as u64)?
            .set_default("server.timeout_disabled", false)?
            .set_default("server.timeout_secs", DEFAULT_SERVER_TIMEOUT_SECS)?
            .set_default("api.timeout_secs", DEFAULT_API_TIMEOUT_SECS)?
            .set_default("log.json", false)?;

        // An explicit file must exist; the working-directory one is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path))),
            None => builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)).required(false)),
        };

        // E.g. OFITEC_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("OFITEC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // clap already folded its env vars into these.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(base) = cli.api_base {
            builder = builder.set_override("api.base_url", base)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("server.timeout_disabled", td)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Configured API base URL, if set and not blank.
    pub fn api_base(&self) -> Option<&str> {
        self.api
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
