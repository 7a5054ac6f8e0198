//! modlib CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modlib_cli::cmd;
use modlib_cli::{Cli, Commands, ModCommands, PackCommands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings, or info with --verbose.
    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = cli.locations.config()?;

    match cli.command {
        Commands::Mods => cmd::list::mods(&config),
        Commands::Packs => cmd::list::packs(&config),
        Commands::Mod { command } => match command {
            ModCommands::New { id } => cmd::mods::new(&config, &id),
            ModCommands::AddFile {
                id,
                file,
                url,
                version,
            } => cmd::mods::add_file(&config, &id, file.as_deref(), url.as_deref(), &version).await,
            ModCommands::Depend { id, deps, version } => {
                cmd::mods::depend(&config, &id, &deps, version.as_ref())
            }
            ModCommands::Get { id, key, version } => {
                cmd::mods::get(&config, &id, &key, version.as_ref())
            }
            ModCommands::Set {
                id,
                key,
                value,
                version,
            } => cmd::mods::set(&config, &id, &key, value, version.as_ref()),
            ModCommands::Info { id } => cmd::mods::info(&config, &id),
        },
        Commands::Pack { command } => match command {
            PackCommands::New {
                name,
                directory,
                version,
            } => cmd::pack::new(&config, &name, directory, version),
            PackCommands::Add { pack, mods } => cmd::pack::add(&config, &pack, &mods),
            PackCommands::Remove { pack, mods } => cmd::pack::remove(&config, &pack, &mods),
            PackCommands::Autoremove { pack } => cmd::pack::autoremove(&config, &pack),
            PackCommands::List { pack } => cmd::pack::list(&config, &pack),
            PackCommands::Fix { pack } => cmd::pack::fix(&config, &pack),
        },
    }
}
