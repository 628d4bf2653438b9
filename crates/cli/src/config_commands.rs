use std::path::PathBuf;

use {anyhow::Result, clap::Subcommand};

use netpulse_config::{NetpulseConfig, Severity, ValidationResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the effective configuration and report errors/warnings.
    Check,
    /// Print the effective configuration with secrets redacted.
    Show,
    /// Write a default config file.
    Init {
        /// Destination (defaults to the user config directory).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config(action: ConfigAction, config: &NetpulseConfig) -> Result<()> {
    match action {
        ConfigAction::Check => {
            let result = netpulse_config::validate(config);
            print_diagnostics(&result);
            if result.has_errors() {
                std::process::exit(1);
            }
            Ok(())
        },
        ConfigAction::Show => {
            println!("{config:#?}");
            Ok(())
        },
        ConfigAction::Init { path, force } => {
            let path = path.unwrap_or_else(netpulse_config::find_or_default_config_path);
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            netpulse_config::save_config(&NetpulseConfig::default(), &path)?;
            eprintln!("Wrote {}", path.display());
            Ok(())
        },
    }
}

/// ANSI color codes.
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn print_diagnostics(result: &ValidationResult) {
    for d in &result.diagnostics {
        let color = match d.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        };
        eprintln!(
            "  {BOLD}{color}{}{RESET} [{}] {}: {}",
            d.severity, d.category, d.path, d.message
        );
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if !result.diagnostics.is_empty() {
        eprintln!();
    }
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }
}
