pub mod roster;
pub mod run;

use anyhow::{Context, Result};
use desk_config::Config;
use desk_core::{Clock, HelpDesk};
use std::sync::Arc;

/// Build a help desk with the configured roster, in config order
pub fn build_desk(config: &Config, clock: Arc<dyn Clock>) -> Result<HelpDesk> {
    let mut desk = HelpDesk::new(clock);
    for tech in &config.roster {
        desk.add_technician(tech.id.as_str(), tech.name.as_str(), tech.extension)
            .with_context(|| format!("adding technician '{}'", tech.id))?;
    }
    Ok(desk)
}
