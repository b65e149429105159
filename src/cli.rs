use bz_core::config::Backend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Catalogue service for items and their images")]
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
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Item storage backend: sqlite or json (overrides config)
        #[arg(long)]
        backend: Option<Backend>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses --config if not specified)
        #[arg(value_name = "CONFIG")]
        path: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_overrides_parse() {
        let cli = Cli::parse_from([
            "bazaar", "start", "--port", "9100", "--backend", "json", "--verbose",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Start { host, port, backend } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(9100));
                assert_eq!(backend, Some(Backend::Json));
            }
            _ => panic!("expected start"),
        }
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Cli::try_parse_from(["bazaar", "start", "--backend", "mongo"]).is_err());
    }

    #[test]
    fn validate_takes_optional_path() {
        let cli = Cli::parse_from(["bazaar", "--config", "a.json", "validate"]);
        assert_eq!(cli.config, Some(PathBuf::from("a.json")));
        assert!(matches!(cli.command, Commands::Validate { path: None }));
    }
}
