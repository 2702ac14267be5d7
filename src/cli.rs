//! Command-line interface argument parsing
//!
//! Defines all CLI commands and their arguments using Clap.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Webservice - white-box vs. black-box request executors
#[derive(Parser, Debug)]
#[command(name = "webservice")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Issue requests through a caller-driven or a framework-driven executor")]
#[command(long_about = concat!(
    "Webservice (v", env!("CARGO_PKG_VERSION"), ")\n",
    "Issue requests through a caller-driven (white-box) or framework-driven (black-box)\n",
    "executor, and wire a house to its newspaper agency by constructor injection."
))]
pub struct Cli {
    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base address requests are issued against
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Append request activity to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Who handles request errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Approach {
    /// The caller receives the outcome and drives error display itself
    WhiteBox,
    /// The framework displays errors and notifies a registered listener
    BlackBox,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a path relative to the base address
    ///
    /// Examples:
    ///   webservice fetch /assets
    ///   webservice fetch /assets --approach black-box
    #[command(display_order = 1)]
    Fetch {
        /// Path appended verbatim to the base address
        path: String,

        /// Executor contract to use
        #[arg(long, value_enum, default_value = "white-box")]
        approach: Approach,
    },

    /// List assets through the asset service
    ///
    /// Example:
    ///   webservice assets --limit 5
    #[command(display_order = 2)]
    Assets {
        /// Maximum number of assets to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Deliver the morning newspaper
    ///
    /// Examples:
    ///   webservice house --owner Batman --agent Alfred --agent Lucius
    ///   webservice house --owner Batman --agent Alfred --coupled
    #[command(display_order = 3)]
    House {
        /// Name of the house owner
        #[arg(long, default_value = "Batman")]
        owner: String,

        /// Name of the news agency
        #[arg(long, default_value = "Gotham Publications")]
        agency: String,

        /// Agents on the agency's roster
        #[arg(long = "agent")]
        agents: Vec<String>,

        /// Wire the house directly to the first agent instead of the agency
        #[arg(long)]
        coupled: bool,
    },

    /// Print the effective configuration
    ///
    /// Examples:
    ///   webservice config
    ///   webservice --base-url http://localhost:8080 config --save
    #[command(display_order = 4)]
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },

    /// Check CLI version
    #[command(display_order = 5)]
    Version,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Global flags as a config to [`Config::merge`] over the file
    ///
    /// Flags that were not given keep their default values, so they never
    /// override the file.
    #[must_use]
    pub fn overrides(&self) -> Config {
        let mut config = Config {
            verbose: self.verbose,
            log_file: self.log_file.clone(),
            ..Config::default()
        };
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        config
    }
}
