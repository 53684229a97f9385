//! Wavedit CLI
//!
//! Command-line front end for the wavedit editing engine.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use wavedit::EditorConfig;

mod cli;

use cli::commands::{self, PasteTarget};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Wavedit v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Wavedit v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &EditorConfig) -> Result<()> {
    match cmd {
        Commands::Info { file } => {
            commands::info(&file).with_context(|| format!("reading {}", file.display()))?
        }
        Commands::Cut {
            file,
            start,
            end,
            out,
        } => commands::cut(&file, start, end, &out.output, config)?,
        Commands::Paste {
            file,
            clip,
            at,
            start,
            end,
            out,
        } => {
            let target = match (at, start, end) {
                (_, Some(start), Some(end)) => PasteTarget::Replace { start, end },
                (Some(at), _, _) => PasteTarget::At(at),
                _ => anyhow::bail!("paste needs --at or both --start and --end"),
            };
            commands::paste(&file, &clip, target, &out.output, config)?
        }
        Commands::Gain {
            file,
            multiplier,
            db,
            start,
            end,
            out,
        } => {
            let multiplier = match (multiplier, db) {
                (Some(m), _) => m,
                (None, Some(db)) => commands::gain_from_db(db),
                (None, None) => anyhow::bail!("gain needs --multiplier or --db"),
            };
            let range = start.zip(end);
            commands::gain(&file, multiplier, range, &out.output, config)?
        }
        Commands::Silence {
            file,
            at,
            duration,
            out,
        } => commands::silence(&file, at, duration, &out.output, config)?,
        Commands::Merge { inputs, out } => commands::merge(&inputs, &out.output, config)?,
    }
    Ok(())
}
