use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use ::config::{Config, Environment, File};
use serde::Deserialize;

const DEV_SESSION_SECRET: &str = "dev-session-secret-change-me";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_seconds: i64,
    pub login_route: String,
    pub seed_demo_data: bool,
    pub demo_admin_password: String,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/hotel.db".into(),
            session_secret: DEV_SESSION_SECRET.into(),
            session_ttl_seconds: 8 * 60 * 60,
            login_route: "/login".into(),
            seed_demo_data: false,
            demo_admin_password: "change-me-now".into(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Settings {
    pub fn uses_dev_secret(&self) -> bool {
        self.session_secret == DEV_SESSION_SECRET
    }
}

/// Defaults, then `server.toml` if present, then `APP__*` variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    let config = Config::builder()
        .add_source(File::with_name("server").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read server configuration")?;

    let mut settings = settings_from(config)?;
    apply_legacy_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn settings_from(config: Config) -> anyhow::Result<Settings> {
    config
        .try_deserialize::<Settings>()
        .context("invalid server configuration")
}

/// Short variable names from older deployments; `APP__*` wins when both are set.
pub(crate) fn apply_legacy_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let aliases: [(&str, &str, &mut String); 3] = [
        ("SERVER_BIND", "APP__BIND_ADDR", &mut settings.bind_addr),
        ("DATABASE_URL", "APP__DATABASE_URL", &mut settings.database_url),
        ("SESSION_SECRET", "APP__SESSION_SECRET", &mut settings.session_secret),
    ];
    for (legacy, preferred, slot) in aliases {
        if lookup(preferred).is_some() {
            continue;
        }
        if let Some(value) = lookup(legacy) {
            *slot = value;
        }
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(parent) = sqlite_path(database_url)
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
    else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(&parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    (!path.is_empty()).then(|| PathBuf::from(path))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
