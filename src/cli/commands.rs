//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for paginated collection APIs
#[derive(Parser, Debug)]
#[command(name = "resource-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Base URL of the API (overrides the settings file)
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides the settings file)
    #[arg(short, long, global = true)]
    pub token: Option<String>,

    /// Log in with this username before running the command
    #[arg(short, long, global = true, requires = "password")]
    pub username: Option<String>,

    /// Password for --username
    #[arg(short, long, global = true, requires = "username")]
    pub password: Option<String>,

    /// Default page size for collection iteration
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// GET a resource and print its body
    Get {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// HEAD a resource and print status and headers
    Head {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print the number of records in a collection
    Count {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print whether a resource exists
    Exists {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print the first record of a collection
    First {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print every record of a collection, one per line
    Each {
        #[command(flatten)]
        target: TargetArgs,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print every page of a collection, one per line
    Pages {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Fetch the same resource until it returns no results
    Drain {
        #[command(flatten)]
        target: TargetArgs,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// The resource a command acts on
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Path relative to the base URL, or an absolute URL
    pub path: String,

    /// Filter expression as JSON; repeat to combine
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Sort field, e.g. `name` or `created_at,desc`; repeat for more
    #[arg(long = "sort")]
    pub sort: Vec<String>,

    /// Sub-resource to embed; repeat for more
    #[arg(long = "embed")]
    pub embed: Vec<String>,

    /// Field to return; repeat for more
    #[arg(long = "only")]
    pub only: Vec<String>,

    /// Extra query parameter as key=value; `key[]=v` builds arrays
    #[arg(short, long = "query", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one value per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_key_value(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{input}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_command() {
        let cli = Cli::try_parse_from([
            "resource-client",
            "--base-url",
            "http://localhost/api",
            "each",
            "tickets",
            "--filter",
            r#"{"status":"open"}"#,
            "--sort",
            "created_at,desc",
            "--embed",
            "customer",
            "--query",
            "ids[]=1",
            "--limit",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://localhost/api"));
        let Commands::Each { target, limit } = cli.command else {
            panic!("expected each");
        };
        assert_eq!(target.path, "tickets");
        assert_eq!(target.filters, vec![r#"{"status":"open"}"#.to_string()]);
        assert_eq!(target.sort, vec!["created_at,desc".to_string()]);
        assert_eq!(target.embed, vec!["customer".to_string()]);
        assert_eq!(target.query, vec![("ids[]".to_string(), "1".to_string())]);
        assert_eq!(limit, Some(10));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["resource-client", "count", "things", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Count { .. }));
    }

    #[test]
    fn test_username_requires_password() {
        assert!(Cli::try_parse_from(["resource-client", "--username", "me", "get", "x"]).is_err());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
