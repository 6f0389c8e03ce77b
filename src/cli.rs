use clap::{Parser, Subcommand};
use obuscope_split::FramingMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "obuscope")]
#[command(author, version, about = "AV1 OBU bitstream inspector")]
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
    /// Split a bitstream file into OBUs and list them
    Split {
        /// Bitstream file (one packet / temporal unit)
        #[arg(required = true)]
        file: PathBuf,

        /// Framing of the input: auto, start-code or length-delimited
        #[arg(long)]
        framing: Option<FramingMode>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Payload bytes to dump per OBU
        #[arg(long)]
        hex: Option<usize>,
    },

    /// Detect the framing of a bitstream file
    Detect {
        /// Bitstream file
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
