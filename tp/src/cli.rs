//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{Budget, Pace};

/// Travel Planner - AI itinerary generator
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Generate day-by-day travel itineraries with an LLM",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the itinerary gateway
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT and config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Plan a trip against a running gateway
    Plan {
        #[command(flatten)]
        trip: TripArgs,

        /// Gateway endpoint
        #[arg(long)]
        api_url: Option<String>,

        /// Run the flow inside the landing-page overlay instead of as pages
        #[arg(long)]
        modal: bool,
    },

    /// Print the prompt the gateway would send, without calling the provider
    Prompt {
        #[command(flatten)]
        trip: TripArgs,
    },
}

/// Trip preferences as given on the command line
#[derive(Debug, Clone, Args)]
pub struct TripArgs {
    /// Where to go
    #[arg(short, long)]
    pub destination: String,

    /// First day (YYYY-MM-DD)
    #[arg(short, long)]
    pub start: String,

    /// Last day (YYYY-MM-DD)
    #[arg(short, long)]
    pub end: String,

    /// Comma-separated interests
    #[arg(short, long)]
    pub interests: String,

    /// budget, medium or luxury
    #[arg(short, long, default_value = "medium")]
    pub budget: Budget,

    /// relaxed, moderate or intense
    #[arg(long, default_value = "moderate")]
    pub pace: Pace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from([
            "tp",
            "plan",
            "--destination",
            "Paris",
            "--start",
            "2025-06-01",
            "--end",
            "2025-06-03",
            "--interests",
            "museums, food",
            "--budget",
            "luxury",
            "--modal",
        ])
        .unwrap();

        match cli.command {
            Command::Plan { trip, modal, api_url } => {
                assert_eq!(trip.destination, "Paris");
                assert_eq!(trip.budget, Budget::Luxury);
                assert_eq!(trip.pace, Pace::Moderate);
                assert!(modal);
                assert!(api_url.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from(["tp", "serve", "--port", "8080", "-l", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Serve { port: Some(8080), host: None }));
    }

    #[test]
    fn test_rejects_unknown_budget() {
        let result = Cli::try_parse_from([
            "tp",
            "prompt",
            "-d",
            "Rome",
            "-s",
            "2025-01-01",
            "-e",
            "2025-01-02",
            "-i",
            "food",
            "--budget",
            "cheap",
        ]);
        assert!(result.is_err());
    }
}
