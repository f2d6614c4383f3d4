use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::url_model::NamingRules;

/// Pattern used for generic `<td><a href=...>name</a></td>` listings.
pub const GEN_PATTERN: &str = r#"<td><a href="(?<link>[^"]+)">(?<name>[^<]+)</a></td>"#;

/// Pattern used for Humble Bundle library pages.
pub const HUMBLE_PATTERN: &str = r#"data-human-name="(?<name>[^"]+)".+?href="(?<link>https://dl\.humble\.com/[^".]+\.{extension}[^".]+)"#;

/// One deployment: where the links come from and how to recognize them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Extraction pattern; `{extension}` is replaced per requested extension.
    /// Must define the named groups `name` and `link`.
    pub pattern: String,
    /// Prefix for relative links. Empty if links are absolute.
    #[serde(default)]
    pub base_url: String,
    /// Comma-separated extensions fetched when `--get` is not given.
    pub formats: String,
}

/// Download engine settings (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Worker threads; `None` uses the available parallelism.
    pub workers: Option<usize>,
    /// Largest slice of the item list processed by one unit of work.
    pub partition_size: usize,
    /// Transfer buffer size in bytes.
    pub buffer_bytes: usize,
    /// Write to `<name>.part` and rename on success. When false, bytes go
    /// straight to the destination and an interrupted transfer leaves a
    /// truncated file that later runs will skip.
    pub atomic_writes: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            workers: None,
            partition_size: 50,
            buffer_bytes: 1024 * 1024,
            atomic_writes: true,
        }
    }
}

/// Per-request limits shared by HEAD and GET.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Hard limit for one request, including the body.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            user_agent: concat!("linkgrab/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingPreset {
    /// Replace `:`, `/` and `\`.
    #[default]
    Default,
    /// Also replace `"`, `*`, `?`, `<`, `>` and `|`.
    Strict,
}

/// File name sanitization settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub preset: NamingPreset,
    /// Extra characters to replace on top of the preset.
    pub extra_chars: Option<String>,
    /// Text that replaces each hazardous character (default `" - "`).
    pub replacement: Option<String>,
}

impl NamingConfig {
    pub fn rules(&self) -> NamingRules {
        let mut rules = match self.preset {
            NamingPreset::Default => NamingRules::default(),
            NamingPreset::Strict => NamingRules::strict(),
        };
        if let Some(extra) = &self.extra_chars {
            rules = rules.with_extra_chars(extra.chars());
        }
        if let Some(replacement) = &self.replacement {
            rules = rules.with_replacement(replacement.as_str());
        }
        rules
    }
}

/// Global configuration loaded from `~/.config/linkgrab/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkgrabConfig {
    /// Profile used when `--profile` is not given.
    pub default_profile: String,
    /// Input fragment, relative to the working directory.
    pub input_file: PathBuf,
    /// Output directory, relative to the working directory.
    pub output_dir: PathBuf,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default = "builtin_profiles")]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for LinkgrabConfig {
    fn default() -> Self {
        Self {
            default_profile: "gen".to_string(),
            input_file: PathBuf::from("page.html"),
            output_dir: PathBuf::from("output"),
            download: DownloadConfig::default(),
            http: HttpConfig::default(),
            naming: NamingConfig::default(),
            profiles: builtin_profiles(),
        }
    }
}

impl LinkgrabConfig {
    /// Looks up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile)> {
        let name = name.unwrap_or(&self.default_profile);
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .with_context(|| {
                let known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
                format!("unknown profile `{}` (known: {})", name, known.join(", "))
            })
    }

    /// Worker count after applying the default.
    pub fn workers(&self) -> usize {
        self.download
            .workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4)
            })
            .max(1)
    }
}

/// The profiles every installation starts with.
pub fn builtin_profiles() -> BTreeMap<String, Profile> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "gen".to_string(),
        Profile {
            pattern: GEN_PATTERN.to_string(),
            base_url: String::new(),
            formats: "pdf".to_string(),
        },
    );
    profiles.insert(
        "humble".to_string(),
        Profile {
            pattern: HUMBLE_PATTERN.to_string(),
            base_url: String::new(),
            formats: "pdf,epub,mobi,cbz".to_string(),
        },
    );
    profiles
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("linkgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LinkgrabConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LinkgrabConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: LinkgrabConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
