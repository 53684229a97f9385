//! CLI Module
//!
//! Command-line interface for editing WAV files without a playback engine.

pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use wavedit::engine::display::SourceHandle;
use wavedit::engine::transport::PlaybackEngine;

/// Wavedit - sample-exact WAV editing
#[derive(Parser, Debug)]
#[command(name = "wavedit-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Editor configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArg {
    /// Where to write the resulting WAV file
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show format, levels and checksum of a WAV file
    #[command(name = "info")]
    Info {
        /// Input WAV file
        file: PathBuf,
    },

    /// Remove a time range
    #[command(name = "cut")]
    Cut {
        file: PathBuf,

        /// Range start in seconds
        #[arg(long)]
        start: f64,

        /// Range end in seconds
        #[arg(long)]
        end: f64,

        #[command(flatten)]
        out: OutputArg,
    },

    /// Paste another WAV file at a point or over a range
    #[command(name = "paste")]
    Paste {
        file: PathBuf,

        /// WAV file to paste
        #[arg(long)]
        clip: PathBuf,

        /// Insert position in seconds
        #[arg(long, conflicts_with_all = ["start", "end"])]
        at: Option<f64>,

        /// Start of the range to replace
        #[arg(long, requires = "end")]
        start: Option<f64>,

        /// End of the range to replace
        #[arg(long, requires = "start")]
        end: Option<f64>,

        #[command(flatten)]
        out: OutputArg,
    },

    /// Scale a range (or the whole file) by a linear multiplier
    #[command(name = "gain")]
    Gain {
        file: PathBuf,

        /// Linear multiplier
        #[arg(long, conflicts_with = "db")]
        multiplier: Option<f32>,

        /// Gain in decibels
        #[arg(long, allow_hyphen_values = true)]
        db: Option<f32>,

        #[arg(long, requires = "end")]
        start: Option<f64>,

        #[arg(long, requires = "start")]
        end: Option<f64>,

        #[command(flatten)]
        out: OutputArg,
    },

    /// Insert silence
    #[command(name = "silence")]
    Silence {
        file: PathBuf,

        /// Insert position in seconds
        #[arg(long)]
        at: f64,

        /// Length in seconds (default from config)
        #[arg(long)]
        duration: Option<f64>,

        #[command(flatten)]
        out: OutputArg,
    },

    /// Concatenate WAV files; directories contribute their .wav files in path order
    #[command(name = "merge")]
    Merge {
        /// Files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        out: OutputArg,
    },
}

/// Playback engine stand-in for batch editing
#[derive(Debug, Default)]
pub struct HeadlessEngine;

impl PlaybackEngine for HeadlessEngine {
    fn load(&mut self, _source: &SourceHandle) {}
    fn release(&mut self, _source: SourceHandle) {}
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn set_time(&mut self, _seconds: f64) {}
    fn play_region(&mut self, _start: f64, _end: f64) {}
}
