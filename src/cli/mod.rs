//! CLI module for the Schema Chat Gateway
//!
//! - `serve`: run the HTTP server
//! - `probe`: send a prompt to a running server and print the streamed frames

pub mod probe;
pub mod serve;

use clap::{Parser, Subcommand};

/// Schema-constrained chat gateway with streaming partial results
#[derive(Parser)]
#[command(name = "schema-chat-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Stream a prompt from a running server
    Probe(probe::ProbeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from(["schema-chat-gateway", "serve", "--port", "9000"]).unwrap();

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.host, None);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_probe() {
        let cli = Cli::try_parse_from([
            "schema-chat-gateway",
            "probe",
            "Write a function to add two numbers",
        ])
        .unwrap();

        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.message, "Write a function to add two numbers");
                assert_eq!(args.url, probe::DEFAULT_URL);
            }
            _ => panic!("expected probe"),
        }
    }

    #[test]
    fn test_probe_requires_message() {
        assert!(Cli::try_parse_from(["schema-chat-gateway", "probe"]).is_err());
    }
}
