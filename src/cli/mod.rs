//! CLI module for Movies Buddy.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Movies Buddy - a TV & movie assistant agent
///
/// Answers questions about TV series and movies using Wikipedia summaries
/// and The TV Database (TVDB), served to the model over MCP.
#[derive(Parser, Debug)]
#[command(name = "movies-buddy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Defaults to `ask` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the agent a single question (prompts for it if omitted)
    Ask {
        /// The question about movies or TV series
        query: Option<String>,

        /// Run timeout in seconds (overrides agent.run_timeout_secs)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Start an interactive chat session with the agent
    Chat,

    /// Fetch a Wikipedia summary for a title, without the model
    Summary {
        /// Title of the TV series or movie
        title: String,
    },

    /// Search TVDB directly, without the model
    Search {
        /// Search term
        query: String,

        /// Filter: series, movie, person, or company
        #[arg(short = 't', long = "type")]
        content_type: Option<String>,

        /// Filter by release/premiere year
        #[arg(short, long)]
        year: Option<i64>,

        /// Restrict to a production company or network
        #[arg(long)]
        company: Option<String>,

        /// Maximum number of results (1-20)
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },

    /// Run the TVDB MCP server on stdio
    Mcp,

    /// Check API keys, TVDB credentials, and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if it does not exist
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["movies-buddy"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::parse_from([
            "movies-buddy", "-vv", "search", "Dark", "--type", "series", "--year", "2017",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Search {
                query,
                content_type,
                year,
                company,
                limit,
            }) => {
                assert_eq!(query, "Dark");
                assert_eq!(content_type.as_deref(), Some("series"));
                assert_eq!(year, Some(2017));
                assert!(company.is_none());
                assert_eq!(limit, 10);
            }
            other => panic!("Expected search command, got {:?}", other),
        }
    }

    #[test]
    fn test_config_after_subcommand() {
        let cli = Cli::parse_from(["movies-buddy", "mcp", "--config", "/tmp/movies.toml"]);
        assert!(matches!(cli.command, Some(Commands::Mcp)));
        assert_eq!(cli.config.as_deref(), Some("/tmp/movies.toml"));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
