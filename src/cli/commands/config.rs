//! Config Command
//!
//! Usage:
//!   mastery config show [-f json]
//!   mastery config path
//!   mastery config init [-g] [--force]

use crate::config::ConfigLoader;
use crate::storage::Database;
use crate::types::Result;

/// Show the merged effective configuration (secrets omitted)
pub fn show(format: &str) -> Result<()> {
    ConfigLoader::show_config(format == "json")
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init_global(force: bool) -> Result<()> {
    let dir = ConfigLoader::init_global(force)?;
    println!("✓ Initialized global configuration");
    println!("  Directory: {}", dir.display());
    if let Some(config_path) = ConfigLoader::global_config_path() {
        println!("  Config:    {}", config_path.display());
    }
    Ok(())
}

/// Create `.mastery/` with a config file and an empty local database
pub fn init_project() -> Result<()> {
    let dir = ConfigLoader::init_project()?;
    let config = ConfigLoader::load()?;
    let db_path = ConfigLoader::database_path(&config);
    Database::open(&db_path)?;

    println!("✓ Initialized project configuration");
    println!("  Directory: {}", dir.display());
    println!(
        "  Config:    {}",
        ConfigLoader::project_config_path().display()
    );
    println!("  Database:  {}", db_path.display());
    println!();
    println!("Next steps:");
    println!("  1. export XAI_API_KEY=... (and OPENROUTER_API_KEY for memorize)");
    println!("  2. mastery login <username>");
    Ok(())
}
