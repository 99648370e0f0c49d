//! Command-line interface definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the coordinates shown by the map widget
    Locate {
        /// Map embed address or page HTML; `-` reads from stdin
        source: String,
    },
    /// Write an answer-circle map around the current location
    Circle {
        /// Map embed address or page HTML; `-` reads from stdin
        source: String,
        /// Circle radius in kilometers (defaults to the configured radius)
        #[arg(short, long, allow_negative_numbers = true)]
        radius: Option<f64>,
        /// Output HTML file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Random seed for a reproducible circle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show the continent of the current location
    Continent {
        /// Map embed address or page HTML; `-` reads from stdin
        source: String,
    },
    /// Show the country of the current location
    Country {
        /// Map embed address or page HTML; `-` reads from stdin
        source: String,
    },
    /// Show the country and region of the current location
    Region {
        /// Map embed address or page HTML; `-` reads from stdin
        source: String,
    },
}

impl Command {
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Command::Locate { source }
            | Command::Circle { source, .. }
            | Command::Continent { source }
            | Command::Country { source }
            | Command::Region { source } => source,
        }
    }
}
