//! Pack commands.

use crate::ui;
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use modlib_core::{Config, ModRegistry, Pack};
use modlib_schema::{GameVersion, ModId};
use std::path::PathBuf;

fn open(config: &Config, name: &str) -> Result<(Pack, ModRegistry)> {
    let pack = Pack::open(config, name)?;
    let registry = ModRegistry::from_config(config)?;
    Ok((pack, registry))
}

/// Create a pack file
pub fn new(config: &Config, name: &str, directory: PathBuf, version: GameVersion) -> Result<()> {
    let pack = Pack::create(config, name, directory, version)?;
    ui::success(&format!(
        "Created {} for {} in {}",
        pack.path().display(),
        pack.version(),
        pack.directory().display()
    ));
    Ok(())
}

/// Add mods, pulling in dependencies
pub fn add(config: &Config, name: &str, mods: &[ModId]) -> Result<()> {
    let (mut pack, mut registry) = open(config, name)?;
    for id in mods {
        let before = pack.mods().len();
        pack.add(&mut registry, id, true)
            .with_context(|| format!("Failed to add {id} to {name}"))?;
        let pulled = pack.mods().len().saturating_sub(before + 1);
        if pulled > 0 {
            ui::success(&format!("Added {id} (+{pulled} dependencies)"));
        } else {
            ui::success(&format!("Added {id}"));
        }
    }
    Ok(())
}

/// Remove mods that nothing depends on
pub fn remove(config: &Config, name: &str, mods: &[ModId]) -> Result<()> {
    let (mut pack, mut registry) = open(config, name)?;
    for id in mods {
        pack.remove(&mut registry, id)
            .with_context(|| format!("Failed to remove {id} from {name}"))?;
        ui::success(&format!("Removed {id}"));
    }
    Ok(())
}

/// Remove dependencies no member needs anymore
pub fn autoremove(config: &Config, name: &str) -> Result<()> {
    let (mut pack, mut registry) = open(config, name)?;
    let removed = pack.autoremove(&mut registry)?;
    if removed.is_empty() {
        ui::info("Nothing to remove");
    }
    for id in removed {
        ui::success(&format!("Removed {id}"));
    }
    Ok(())
}

/// Show members, how they got there and who needs them
pub fn list(config: &Config, name: &str) -> Result<()> {
    let (pack, _) = open(config, name)?;
    let theme = ui::Theme::default();

    println!();
    ui::heading(
        &pack.path().display().to_string(),
        &format!("{} -> {}", pack.version(), pack.directory().display()),
    );
    println!();

    if pack.mods().is_empty() {
        ui::info("No mods in this pack.");
        return Ok(());
    }

    for (id, member) in pack.mods() {
        let marker = if member.manually {
            theme.icons.manual.with(theme.colors.success)
        } else {
            theme.icons.dependency.with(theme.colors.secondary)
        };
        if member.dependants.is_empty() {
            println!("  {marker} {id}");
        } else {
            let needed_by: Vec<&str> = member.dependants.iter().map(ModId::as_str).collect();
            println!(
                "  {marker} {id} {}",
                format!("(needed by {})", needed_by.join(", ")).with(theme.colors.secondary)
            );
        }
    }
    Ok(())
}

/// Add missing dependencies and fix dependant records
pub fn fix(config: &Config, name: &str) -> Result<()> {
    let (mut pack, mut registry) = open(config, name)?;
    let report = pack.repair(&mut registry)?;

    if report.is_empty() {
        ui::success("Pack is consistent");
        return Ok(());
    }
    for id in &report.added {
        ui::success(&format!("Added missing dependency {id}"));
    }
    for (dependency, dependant) in &report.linked {
        ui::success(&format!("Recorded {dependant} as needing {dependency}"));
    }
    for (member, stale) in &report.pruned {
        ui::success(&format!("Dropped {stale} from {member}'s dependants"));
    }
    Ok(())
}
