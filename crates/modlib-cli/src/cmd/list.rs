//! Listing stored mods and pack files.

use crate::ui;
use anyhow::{Context, Result};
use modlib_core::{Config, ModRegistry, list_packs};

/// List all mods in storage
pub fn mods(config: &Config) -> Result<()> {
    let registry = ModRegistry::from_config(config)?;
    let ids = registry.list().context("Failed to list mod storage")?;
    if ids.is_empty() {
        ui::info(&format!(
            "No mods in {}. Run 'modlib mod new <id>' to create one.",
            registry.root().display()
        ));
        return Ok(());
    }
    for id in ids {
        println!("{id}");
    }
    Ok(())
}

/// List all pack files
pub fn packs(config: &Config) -> Result<()> {
    let names = list_packs(config).context("Failed to list packs")?;
    if names.is_empty() {
        ui::info(&format!("No packs in {}.", config.packs_dir().display()));
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
