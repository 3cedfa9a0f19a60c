//! sks init - Initialize the sks root directory

use clap::Args;
use colored::Colorize;

use crate::app::resolve_root;
use crate::config::Config;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Runs before an `AppContext` exists: init is what makes one constructible.
pub fn run_without_context(robot: bool, args: &InitArgs) -> Result<()> {
    let root = resolve_root();
    let config_path = root.join("config.toml");
    let skills_dir = root.join("skills");

    std::fs::create_dir_all(&skills_dir)?;
    std::fs::create_dir_all(root.join("index"))?;

    let wrote_config = if config_path.exists() && !args.force {
        false
    } else {
        Config::write_default(&config_path)?;
        true
    };

    if robot {
        println!(
            "{}",
            serde_json::json!({
                "status": "completed",
                "root": root.display().to_string(),
                "config_written": wrote_config,
            })
        );
        return Ok(());
    }

    println!(
        "{} Initialized sks root at {}",
        "✓".green().bold(),
        root.display()
    );
    if wrote_config {
        println!("  Wrote default config to {}", config_path.display());
    } else {
        println!(
            "  {} config already exists, use --force to overwrite",
            "!".yellow()
        );
    }
    println!();
    println!("Add skills under {} and run:", skills_dir.display());
    println!("  sks index");
    Ok(())
}
