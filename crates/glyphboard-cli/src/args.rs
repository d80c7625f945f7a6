//! Command-line argument definitions for the Glyphboard CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand picks the direction of translation; the
//! configuration file and logging verbosity apply to all of them.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Glyphboard layout compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate C++ layout sources from a project snapshot
    Generate {
        /// Path to the project snapshot (JSON)
        input: String,

        /// Directory the header and source file are written to
        #[arg(short, long, default_value = ".")]
        out_dir: String,
    },

    /// Rebuild a project snapshot from generated sources
    Import {
        /// Path to the generated declarations header
        declarations: String,

        /// Path to the generated implementation source
        implementation: String,

        /// Path to the project snapshot to write (JSON)
        #[arg(short, long, default_value = "project.json")]
        output: String,
    },

    /// List the templates of an asset library file
    Assets {
        /// Path to the asset library (JSON)
        library: String,
    },
}
