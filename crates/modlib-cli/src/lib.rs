//! modlib - versioned mod storage and packs
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line front end over `modlib-core`.
//!
//! # Overview
//!
//! Mods are stored once, with one file per target version. A pack picks a
//! version and a directory; adding a mod to it materializes the mod's file
//! (and its dependencies' files) there, and removing it cleans up again.

pub mod cmd;
pub mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use modlib_core::Config;
use modlib_schema::{GameVersion, ModId};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "modlib")]
#[command(author, version, about = "modlib - manage versioned mods and packs")]
pub struct Cli {
    #[command(flatten)]
    pub locations: Locations,

    /// Log what is being done
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured directories.
#[derive(Debug, Args)]
pub struct Locations {
    /// Mod storage directory
    #[arg(long, global = true, env = "MODLIB_STORAGE")]
    pub storage: Option<PathBuf>,

    /// Directory holding pack files
    #[arg(long, global = true, env = "MODLIB_PACKS")]
    pub packs: Option<PathBuf>,

    /// Copy files into pack directories instead of symlinking them
    #[arg(long, global = true)]
    pub copy: bool,
}

impl Locations {
    /// Load configuration files and apply the overrides on top.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load().context("Failed to load configuration")?;
        if let Some(storage) = &self.storage {
            config.mods.directory.clone_from(storage);
        }
        if let Some(packs) = &self.packs {
            config.packs.directory.clone_from(packs);
        }
        if self.copy {
            config.packs.use_symlinks = false;
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List stored mods
    Mods,
    /// List pack files
    Packs,
    /// Manage stored mods
    Mod {
        #[command(subcommand)]
        command: ModCommands,
    },
    /// Manage packs
    Pack {
        #[command(subcommand)]
        command: PackCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ModCommands {
    /// Create an empty mod
    New {
        /// Mod id
        id: ModId,
    },
    /// Store a file as the mod's release for a version
    AddFile {
        /// Mod id
        id: ModId,
        /// Local file to move into storage
        #[arg(required_unless_present = "url", conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Download the file instead
        #[arg(long)]
        url: Option<String>,
        /// Target version (e.g. 1.20.1)
        #[arg(long)]
        version: GameVersion,
    },
    /// Declare dependencies on other stored mods
    Depend {
        /// Mod id
        id: ModId,
        /// Mods it requires
        #[arg(required = true)]
        deps: Vec<ModId>,
        /// Only for this version
        #[arg(long)]
        version: Option<GameVersion>,
    },
    /// Print an attribute
    Get {
        /// Mod id
        id: ModId,
        /// Attribute name
        key: String,
        /// Resolve for this version
        #[arg(long)]
        version: Option<GameVersion>,
    },
    /// Set an attribute (value is JSON, or a plain string)
    Set {
        /// Mod id
        id: ModId,
        /// Attribute name
        key: String,
        /// New value
        value: String,
        /// Set only for this version
        #[arg(long)]
        version: Option<GameVersion>,
    },
    /// Show a mod's attributes per version
    Info {
        /// Mod id
        id: ModId,
    },
}

#[derive(Debug, Subcommand)]
pub enum PackCommands {
    /// Create a pack
    New {
        /// Pack file name
        name: String,
        /// Directory that receives the mod files
        directory: PathBuf,
        /// Target version (e.g. 1.20.1)
        #[arg(long)]
        version: GameVersion,
    },
    /// Add mods and their dependencies
    Add {
        /// Pack name or path
        pack: String,
        /// Mods to add
        #[arg(required = true)]
        mods: Vec<ModId>,
    },
    /// Remove mods nothing depends on
    Remove {
        /// Pack name or path
        pack: String,
        /// Mods to remove
        #[arg(required = true)]
        mods: Vec<ModId>,
    },
    /// Remove dependencies no longer needed
    Autoremove {
        /// Pack name or path
        pack: String,
    },
    /// List pack members
    List {
        /// Pack name or path
        pack: String,
    },
    /// Add missing dependencies and fix dependency records
    Fix {
        /// Pack name or path
        pack: String,
    },
}
