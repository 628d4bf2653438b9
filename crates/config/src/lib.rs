//! Configuration loading, validation, and env substitution.
//!
//! Config files: `netpulse.toml`, `netpulse.yaml`, or `netpulse.json`
//! Searched in `./` then `~/.config/netpulse/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, and the
//! deployment variables listed in [`loader::ENV_OVERRIDES`] override file
//! values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{
        apply_env_overrides, config_dir, discover_and_load, find_or_default_config_path,
        load_config, save_config,
    },
    schema::{
        AlertsConfig, ControllerConfig, LoggingConfig, NetpulseConfig, ServerConfig, UploadConfig,
        WebexConfig,
    },
    validate::{Diagnostic, Severity, ValidationResult, validate},
};
