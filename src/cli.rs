//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// linkstash - a small self-hosted URL shortener
#[derive(Parser)]
#[command(name = "linkstash")]
#[command(version)]
#[command(about = "A small self-hosted URL shortener", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml, linkstash.toml, config/linkstash.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands; no command starts the server
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Shorten one or more URLs in a single batch
    Add {
        /// Target URLs (at most the configured batch size are used)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Custom shortcode; only with a single URL
        #[arg(long)]
        code: Option<String>,

        /// Validity in minutes (default from config)
        #[arg(long)]
        validity: Option<String>,
    },

    /// List all short links, newest first
    List,

    /// Show the click log of a short code
    Clicks {
        /// Short code
        code: String,
    },

    /// Show the action log, newest first
    Logs,

    /// Empty the action log
    ClearLogs,

    /// Remove every expired link
    Sweep,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}
