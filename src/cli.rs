use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interstitch")]
#[command(author, version, about = "Interactive stitched-playlist playback tool")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a scripted interactive session through a plan file
    Simulate {
        /// Plan file describing assets and scripted branch decisions
        #[arg(required = true)]
        plan: PathBuf,

        /// Virtual clock step per tick, in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,
    },

    /// Build and display the segment map for a plan file
    Inspect {
        /// Plan file describing assets
        #[arg(required = true)]
        plan: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
