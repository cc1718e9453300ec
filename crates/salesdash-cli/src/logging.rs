// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "SALESDASH_LOG";

/// Installs the global subscriber. Logs go to a file because the terminal is
/// owned by the TUI while it runs.
pub fn init(configured_level: &str, file: Option<PathBuf>) -> Result<PathBuf> {
    let path = match file {
        Some(path) => path,
        None => default_log_path()?,
    };
    let writer = open_log_file(&path)?;

    let filter = build_env_filter(
        env::var(LOG_ENV).ok(),
        env::var(EnvFilter::DEFAULT_ENV).ok(),
        configured_level,
    )?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(path)
}

fn build_env_filter(
    app_env: Option<String>,
    rust_log: Option<String>,
    configured: &str,
) -> Result<EnvFilter> {
    for directives in [app_env, rust_log].into_iter().flatten() {
        if let Ok(filter) = EnvFilter::try_new(&directives) {
            return Ok(filter);
        }
    }

    EnvFilter::try_new(configured).with_context(|| {
        format!(
            "invalid log.level {configured:?}; use a filter such as {:?} or {:?}",
            "info", "salesdash_app=debug"
        )
    })
}

fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [log].file to a writable path")
    })?;
    Ok(data_root
        .join(salesdash_db::APP_NAME)
        .join("salesdash.log"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [log].file to a writable path",
                path.display()
            )
        })
}
