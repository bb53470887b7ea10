//! CLI mode
//!
//! One-shot commands that reuse the lookup pipeline without starting the server.

use std::path::Path;

use colored::Colorize;

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::errors::{GeoError, Result};
use crate::runtime::lifetime;
use crate::utils::IpAddress;

/// Run a non-server command
pub async fn run_cli(command: Commands, config: &StaticConfig) -> Result<()> {
    match command {
        Commands::Lookup { ip } => lookup(&ip, config).await,
        Commands::GenerateConfig { path, force } => generate_config(path, force),
        Commands::Serve => Err(GeoError::config("serve is not a CLI command")),
    }
}

async fn lookup(ip: &str, config: &StaticConfig) -> Result<()> {
    let target = IpAddress::parse(ip)?;

    let startup = lifetime::startup::prepare_startup(config)
        .await
        .map_err(|e| match e.downcast::<GeoError>() {
            Ok(err) => err,
            Err(other) => GeoError::config(format!("{:#}", other)),
        })?;

    let outcome = startup.locator.locate(&target).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn generate_config(path: Option<String>, force: bool) -> Result<()> {
    let Some(path) = path else {
        print!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if !force && Path::new(&path).exists() {
        return Err(GeoError::file_operation(format!(
            "File already exists: {} (use --force to overwrite)",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| GeoError::file_operation(format!("Failed to write {}: {}", path, e)))?;

    println!(
        "{} {}",
        "Configuration file generated successfully:".green(),
        path.blue()
    );
    Ok(())
}
