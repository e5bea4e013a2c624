use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

pub const SECRETS_FILE: &str = "Secrets.toml";

pub fn workspace_dir() -> PathBuf {
    let located = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|path| {
            Path::new(path.trim()).parent().map(Path::to_path_buf)
        });

    // outside of cargo, the working directory is the root
    match located {
        Some(dir) => dir,
        None => std::env::current_dir().unwrap_or_default(),
    }
}

/// `Config.toml`, or `Config.dev.toml` for the `.dev` suffix.
pub fn config_name(suffix: Option<&str>) -> String {
    format!("Config{}.toml", suffix.unwrap_or_default())
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_toml(&workspace_dir().join(config_name))
}

pub fn load_toml(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<Map<String, Value>>(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Secrets are optional on disk: CI and deploys pass them as env vars.
pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir().join(SECRETS_FILE);
    if !path.exists() {
        return Ok(Map::new());
    }

    load_toml(&path)
}

/// Looks a secret up in the process environment first, then in the secrets
/// file.
pub fn secret(secrets: &Map<String, Value>, key: &str) -> Option<String> {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            return Some(value);
        }
    }

    secrets
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn require_secret(
    secrets: &Map<String, Value>,
    key: &str,
) -> anyhow::Result<String> {
    secret(secrets, key).with_context(|| format!("{} was not found", key))
}
