//! CLI argument definitions using clap
//!
//! Commands:
//! - userdir serve [--host <host>] [--port <port>] [--database-url <url>]
//! - userdir config

use clap::{Args, Parser, Subcommand};

/// userdir - a user directory service
#[derive(Parser, Debug)]
#[command(name = "userdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select a backend and serve the HTTP API
    Serve(ServerArgs),

    /// Print the effective configuration and exit
    Config(ServerArgs),
}

/// Overrides applied on top of the environment
#[derive(Args, Debug, Default, Clone)]
pub struct ServerArgs {
    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// PostgreSQL connection URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Startup connection timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Allowed CORS origin (repeatable)
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "userdir",
            "-vv",
            "serve",
            "--port",
            "7000",
            "--cors-origin",
            "http://a.test",
            "--cors-origin",
            "http://b.test",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(7000));
                assert_eq!(args.cors_origins.len(), 2);
                assert!(args.database_url.is_none());
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["userdir"]).is_err());
    }
}
