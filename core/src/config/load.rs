use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::AppConfig;

/// Get the default conductor data directory: ~/.conductor
pub fn get_conductor_data_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(home).join(".conductor"))
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ~/.conductor/config.toml
    let home_config = get_conductor_data_dir()?.join("config.toml");

    // Priority 2: ./conductor.toml (current directory)
    let local_config = Path::new("conductor.toml");

    let mut cfg = if home_config.exists() {
        load_from_path(&home_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |name| std::env::var(name).ok())?;
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Environment variable overrides (highest priority).
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CONDUCTOR_HOST") {
        cfg.http_server.host = v.trim().to_string();
    }
    if let Some(v) = get("CONDUCTOR_PORT") {
        cfg.http_server.port = parse_env("CONDUCTOR_PORT", &v)?;
    }
    if let Some(v) = get("CONDUCTOR_MAX_PARALLEL") {
        let n: usize = parse_env("CONDUCTOR_MAX_PARALLEL", &v)?;
        cfg.executor.max_parallel = (n > 0).then_some(n);
    }
    if let Some(v) = get("CONDUCTOR_TASK_TIMEOUT_MS") {
        cfg.executor.task_timeout_ms = parse_env("CONDUCTOR_TASK_TIMEOUT_MS", &v)?;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}
