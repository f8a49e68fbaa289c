use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::profile::Profile;

/// Standard download timeout of the crawl pipeline, in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: f64 = 180.0;

/// Profile used when a request asks for impersonation without naming one.
pub const DEFAULT_IMPERSONATE: &str = "chrome120";

/// Global configuration loaded from `~/.config/impdl/config.toml`.
///
/// Every field has a default so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpdlConfig {
    /// Fallback impersonation profile id (e.g. "chrome120", "safari15_5").
    pub default_impersonate: String,
    /// Per-request timeout in seconds unless the request overrides it.
    pub download_timeout_secs: f64,
    /// Verify TLS peer certificates and host names.
    pub verify_tls: bool,
    /// Proxy URL applied to every request that does not carry its own.
    pub proxy: Option<String>,
    /// Local interface or address to bind outgoing connections to.
    pub bind_address: Option<String>,
    /// Send the profile's default browser headers alongside request headers.
    pub default_headers: bool,
}

impl Default for ImpdlConfig {
    fn default() -> Self {
        Self {
            default_impersonate: DEFAULT_IMPERSONATE.to_string(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            verify_tls: true,
            proxy: None,
            bind_address: None,
            default_headers: true,
        }
    }
}

/// Settings the option translators read; derived once from `ImpdlConfig`
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerSettings {
    pub default_profile: Profile,
    pub download_timeout: Duration,
    pub verify_tls: bool,
    pub proxy: Option<String>,
    pub bind_address: Option<String>,
    pub default_headers: bool,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            default_profile: Profile::Chrome120,
            download_timeout: Duration::from_secs_f64(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            verify_tls: true,
            proxy: None,
            bind_address: None,
            default_headers: true,
        }
    }
}

impl ImpdlConfig {
    /// Validate and convert into handler settings.
    pub fn handler_settings(&self) -> Result<HandlerSettings> {
        let default_profile: Profile = self
            .default_impersonate
            .parse()
            .with_context(|| format!("default_impersonate = {:?}", self.default_impersonate))?;
        if !self.download_timeout_secs.is_finite() || self.download_timeout_secs <= 0.0 {
            anyhow::bail!(
                "download_timeout_secs must be a positive number, got {}",
                self.download_timeout_secs
            );
        }
        let download_timeout = Duration::try_from_secs_f64(self.download_timeout_secs).with_context(|| {
            format!("download_timeout_secs {} is out of range", self.download_timeout_secs)
        })?;
        Ok(HandlerSettings {
            default_profile,
            download_timeout,
            verify_tls: self.verify_tls,
            proxy: self.proxy.clone().filter(|p| !p.is_empty()),
            bind_address: self.bind_address.clone().filter(|b| !b.is_empty()),
            default_headers: self.default_headers,
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("impdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImpdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImpdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<ImpdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: ImpdlConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}
