//! Mod storage commands.

use crate::ui;
use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use modlib_core::download::download;
use modlib_core::{Config, ModRegistry};
use modlib_schema::{AttributeMap, GameVersion, JAR, LINK, ModId, URL};
use serde_json::Value;
use std::path::Path;

/// Create an empty mod
pub fn new(config: &Config, id: &ModId) -> Result<()> {
    let mut registry = ModRegistry::from_config(config)?;
    registry.create(id)?;
    ui::success(&format!("Created {id}"));
    Ok(())
}

/// Store a local or downloaded file as the mod's release for `version`
pub async fn add_file(
    config: &Config,
    id: &ModId,
    file: Option<&Path>,
    url: Option<&str>,
    version: &GameVersion,
) -> Result<()> {
    let mut registry = ModRegistry::from_config(config)?;
    // Fail on unknown ids before downloading anything.
    registry.get_or_load(id)?;

    // Keeps the download alive until the file has been moved into storage.
    let staging = tempfile::tempdir().context("Failed to create download directory")?;
    let source = match (file, url) {
        (Some(file), _) => file.to_path_buf(),
        (None, Some(url)) => {
            ui::info(&format!("Downloading {url}"));
            let client = reqwest::Client::new();
            download(&client, url, staging.path())
                .await
                .with_context(|| format!("Failed to download {url}"))?
        }
        (None, None) => bail!("Either a file or --url is required"),
    };

    let m = registry.get_or_load(id)?;
    m.set_file(&source, version)
        .with_context(|| format!("Failed to store {}", source.display()))?;
    if let Some(url) = url {
        m.set(URL, Value::from(url), Some(version));
        m.write()?;
    }
    ui::success(&format!("Stored {} for {id} {version}", source.display()));
    Ok(())
}

/// Declare dependencies
pub fn depend(
    config: &Config,
    id: &ModId,
    deps: &[ModId],
    version: Option<&GameVersion>,
) -> Result<()> {
    let mut registry = ModRegistry::from_config(config)?;
    registry.add_dependencies(id, deps, version)?;

    let list = registry.get_or_load(id)?.dependencies(version)?;
    let list: Vec<&str> = list.iter().map(ModId::as_str).collect();
    ui::success(&format!("{id} depends on: {}", list.join(", ")));
    Ok(())
}

/// Print an attribute; strings are printed without quotes
pub fn get(config: &Config, id: &ModId, key: &str, version: Option<&GameVersion>) -> Result<()> {
    let mut registry = ModRegistry::from_config(config)?;
    match registry.get_or_load(id)?.get(key, version)? {
        Value::String(s) => println!("{s}"),
        other => println!("{other}"),
    }
    Ok(())
}

/// Set an attribute and persist
pub fn set(
    config: &Config,
    id: &ModId,
    key: &str,
    value: String,
    version: Option<&GameVersion>,
) -> Result<()> {
    let value = serde_json::from_str(&value).unwrap_or_else(|_| Value::String(value));
    let mut registry = ModRegistry::from_config(config)?;
    let m = registry.get_or_load(id)?;
    m.set(key, value, version);
    m.write()?;
    ui::success(&format!("Set {key} for {id}"));
    Ok(())
}

/// Show general attributes and every version's overrides
pub fn info(config: &Config, id: &ModId) -> Result<()> {
    let mut registry = ModRegistry::from_config(config)?;
    let m = registry.get_or_load(id)?;
    let attributes = m.attributes();
    let versions: Vec<&GameVersion> = attributes.versions().collect();

    println!();
    let published = versions.iter().filter(|v| m.publishes(v)).count();
    ui::heading(id.as_str(), &format!("{published} version(s) published"));
    println!();
    print_map(attributes.general());

    for version in versions {
        println!();
        let theme = ui::Theme::default();
        let marker = if m.publishes(version) {
            theme.icons.success.with(theme.colors.success)
        } else {
            theme.icons.warning.with(theme.colors.warning)
        };
        println!(
            "  {marker} {}",
            version.as_str().with(theme.colors.version).bold()
        );
        if let Some(overrides) = attributes.version(version) {
            print_map(overrides);
        }
        // A dangling version link means the stored file went away.
        if let (Ok(jar), Ok(link)) = (m.file(JAR, Some(version)), m.file(LINK, Some(version))) {
            if !link.exists() {
                ui::row("missing", &jar.display().to_string());
            }
        }
    }
    Ok(())
}

fn print_map(map: &AttributeMap) {
    for (key, value) in map {
        match value {
            Value::String(s) => ui::row(key, s),
            other => ui::row(key, &other.to_string()),
        }
    }
}
