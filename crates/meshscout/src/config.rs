//! CLI-owned configuration: TOML file + environment + flag overrides.
//!
//! Core never sees these types. The config resolves to a base URL, a
//! transport setup, and default discovery parameters; flags always win.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use meshscout_api::{DEFAULT_BASE_URL, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config struct ───────────────────────────────────────────────

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Analyzer API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Default region code or group for `nodes`.
    #[serde(default = "default_region")]
    pub region: String,

    /// Default lookback window in days.
    #[serde(default = "default_days")]
    pub days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            region: default_region(),
            days: default_days(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_region() -> String {
    "SEA".into()
}
fn default_days() -> u32 {
    7
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "meshscout", "meshscout")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meshscout");
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full config from defaults + file + environment.
///
/// Precedence (lowest to highest): built-in defaults, the TOML file,
/// `MESHSCOUT_*` environment variables. CLI flags override on top via
/// [`resolve`].
pub fn load(explicit_path: Option<&PathBuf>) -> Result<Config, CliError> {
    let path = explicit_path.cloned().unwrap_or_else(config_path);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("MESHSCOUT_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution against CLI flags ─────────────────────────────────────

/// Effective settings after applying global flag overrides.
pub struct Resolved {
    pub base_url: String,
    pub transport: TransportConfig,
}

/// Merge global CLI flags over the loaded config.
pub fn resolve(config: &Config, global: &GlobalOpts) -> Resolved {
    let base_url = global
        .base_url
        .clone()
        .unwrap_or_else(|| config.base_url.clone());

    let timeout = global.timeout.unwrap_or(config.timeout);

    Resolved {
        base_url,
        transport: TransportConfig {
            timeout: Duration::from_secs(timeout),
            ..TransportConfig::default()
        },
    }
}
