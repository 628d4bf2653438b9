use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::NetpulseConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "netpulse.toml",
    "netpulse.yaml",
    "netpulse.yml",
    "netpulse.json",
];

/// Deployment variables that override file values.
pub const ENV_OVERRIDES: &[&str] = &[
    "WEBEX_TEAMS_ACCESS_TOKEN",
    "WEBEX_TEAMS_ROOM_NAME",
    "NETPULSE_PUBLIC_URL",
    "DNAC_BASE_URL",
    "DNAC_USERNAME",
    "DNAC_PASSWORD",
    "DNAC_VERIFY_TLS",
    "logging_level",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<NetpulseConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./netpulse.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/netpulse/netpulse.{toml,yaml,yml,json}` (user-global)
///
/// Returns `NetpulseConfig::default()` if no config file is found. A file
/// that exists but cannot be read or parsed is an error. Env overrides are
/// applied on success.
pub fn discover_and_load() -> anyhow::Result<NetpulseConfig> {
    load_or_default(find_config_file().as_deref())
}

fn load_or_default(path: Option<&Path>) -> anyhow::Result<NetpulseConfig> {
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(path)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?
        },
        None => {
            debug!("no config file found, using defaults");
            NetpulseConfig::default()
        },
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Apply [`ENV_OVERRIDES`] from the process environment.
pub fn apply_env_overrides(config: &mut NetpulseConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut NetpulseConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get("WEBEX_TEAMS_ACCESS_TOKEN") {
        config.webex.access_token = Secret::new(token);
    }
    if let Some(room) = get("WEBEX_TEAMS_ROOM_NAME") {
        config.webex.room_name = room;
    }
    if let Some(url) = get("NETPULSE_PUBLIC_URL") {
        config.webex.public_url = Some(url);
    }
    if let Some(url) = get("DNAC_BASE_URL") {
        config.controller.base_url = url;
    }
    if let Some(user) = get("DNAC_USERNAME") {
        config.controller.username = user;
    }
    if let Some(password) = get("DNAC_PASSWORD") {
        config.controller.password = Secret::new(password);
    }
    if let Some(flag) = get("DNAC_VERIFY_TLS") {
        match parse_bool(&flag) {
            Some(verify) => config.controller.verify_tls = verify,
            None => warn!(value = %flag, "ignoring unparsable DNAC_VERIFY_TLS"),
        }
    }
    if let Some(level) = get("logging_level") {
        config.logging.level = level.to_lowercase();
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    let dir = config_dir()?;
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the user-global config directory (`~/.config/netpulse/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "netpulse").map(|d| d.config_dir().to_path_buf())
}

/// Returns the path of an existing config file, or the default TOML path.
pub fn find_or_default_config_path() -> PathBuf {
    if let Some(path) = find_config_file() {
        return path;
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("netpulse.toml")
}

/// Serialize `config` to TOML at `path`, creating parent directories.
pub fn save_config(config: &NetpulseConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serialize config: {e}"))?;
    std::fs::write(path, toml_str)?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<NetpulseConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
