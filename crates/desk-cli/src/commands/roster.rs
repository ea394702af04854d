use anyhow::Result;
use desk_config::Config;
use desk_core::SystemClock;
use std::sync::Arc;

use super::build_desk;

pub fn handle(config: &Config) -> Result<()> {
    let desk = build_desk(config, Arc::new(SystemClock))?;

    if desk.technicians().next().is_none() {
        println!("No technicians configured.");
        println!("  Add [[roster]] entries to {}", Config::config_path().display());
        return Ok(());
    }

    println!("Technicians (assignment order):");
    for (position, tech) in desk.technicians().enumerate() {
        println!("  {}. {} ({})", position + 1, tech.name(), tech.id());
        println!("     Extension: {}", tech.extension());
    }

    Ok(())
}
