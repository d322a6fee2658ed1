pub mod config;

use clap::{Parser, Subcommand};

/// Dharma Gateway, a guided-conversation backend.
#[derive(Debug, Parser)]
#[command(name = "dharma-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the gateway server (default when no subcommand is given).
    Serve,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse and validate the config file.
    Validate,
    /// Dump the resolved config (with all defaults filled in) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Load the configuration from the path specified by `DG_CONFIG` (or
/// `config.toml` by default). A missing file is not an error; every
/// section has defaults. Returns the parsed config and the path used.
pub fn load_config() -> anyhow::Result<(dg_domain::config::Config, String)> {
    let config_path = std::env::var("DG_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        dg_domain::config::Config::default()
    };

    Ok((config, config_path))
}
