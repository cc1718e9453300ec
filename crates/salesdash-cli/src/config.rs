// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use salesdash_app::PageSize;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_SEED: u64 = 42;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub demo: Demo,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            ui: Ui::default(),
            demo: Demo::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    /// Unset means requests wait as long as the server takes.
    pub timeout: Option<String>,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<u32>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(PageSize::default().get()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Demo {
    pub data_file: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("SALESDASH_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set SALESDASH_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(salesdash_db::APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            let parsed = url_scheme(base_url);
            if !matches!(parsed, Some("http") | Some("https")) {
                bail!(
                    "api.base_url in {} must be an http(s) URL, got {:?}",
                    path.display(),
                    base_url
                );
            }
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)
                .with_context(|| format!("api.timeout in {}", path.display()))?;
            if parsed.is_zero() {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(size) = self.ui.page_size
            && PageSize::from_value(size).is_none()
        {
            bail!(
                "ui.page_size in {} must be one of 1, 5, 10, got {}",
                path.display(),
                size
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} must not be empty; use a filter such as {:?} or {:?}",
                path.display(),
                "info",
                "salesdash_app=debug"
            );
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.api
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.api.timeout.as_deref().map(parse_duration).transpose()
    }

    pub fn page_size(&self) -> PageSize {
        self.ui
            .page_size
            .and_then(PageSize::from_value)
            .unwrap_or_default()
    }

    pub fn demo_data_file(&self) -> Option<PathBuf> {
        self.demo.data_file.as_deref().map(PathBuf::from)
    }

    pub fn demo_seed(&self) -> u64 {
        self.demo.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_deref().map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# salesdash config\n# Place this file at: {}\n\nversion = 1\n\n[api]\nbase_url = \"{}\"\n# Optional. <N>ms, <N>s or <N>m; requests never time out when unset\n# timeout = \"30s\"\n\n[ui]\n# One of 1, 5, 10\npage_size = {}\n\n[demo]\n# Optional. JSON document of the form {{\"salesReps\": [...]}} loaded by --demo\n# data_file = \"/absolute/path/to/dummyData.json\"\nseed = {}\n\n[log]\n# Overridden by SALESDASH_LOG or RUST_LOG\nlevel = \"{}\"\n# Optional. Default is the platform data dir (for example ~/.local/share/salesdash/salesdash.log)\n# file = \"/absolute/path/to/salesdash.log\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            PageSize::default().get(),
            DEFAULT_SEED,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn url_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once("://")?;
    if rest.is_empty() {
        return None;
    }
    Some(scheme)
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}
