//! Command-line interface definitions.
//!
//! Every option can also come from the YAML file given with `--config`; a flag
//! given on the command line always wins over the file.

use crate::config::{FailurePolicy, MissingRequired};
use crate::models::Field;
use crate::scrapers::normalize::SentinelStyle;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # All genres into ./data, abort on the first failure
/// comment_ranking -o ./data
///
/// # Keep going when a genre fails, BOM for spreadsheet tools
/// comment_ranking -o ./data --policy lenient --bom
///
/// # Only two genres, with a YAML config for selectors
/// comment_ranking -c ranking.yaml -g world -g business
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for the per-day CSV directories
    #[arg(short, long, env = "CMNT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Fixed subdirectory between the output root and the per-day directory
    #[arg(long, env = "CMNT_SUBDIR")]
    pub subdir: Option<String>,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "CMNT_CONFIG")]
    pub config: Option<PathBuf>,

    /// What a failed genre does to the rest of the run
    #[arg(long, value_enum)]
    pub policy: Option<FailurePolicy>,

    /// What an entry missing a required field does to its genre
    #[arg(long, value_enum)]
    pub on_missing_required: Option<MissingRequired>,

    /// Fields an entry must have besides `rank`, which is always required (repeatable)
    #[arg(long = "require", value_enum)]
    pub required_fields: Vec<Field>,

    /// Placeholder style for missing optional fields
    #[arg(long, value_enum)]
    pub sentinel: Option<SentinelStyle>,

    /// Prefix CSV files with a UTF-8 byte order mark
    #[arg(long)]
    pub bom: bool,

    /// Pause between consecutive page requests, in seconds
    #[arg(long)]
    pub pause_secs: Option<f64>,

    /// Only capture these genre codes (repeatable)
    #[arg(short, long = "genre")]
    pub genres: Vec<String>,

    /// User-Agent header sent to the portal
    #[arg(long, env = "CMNT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["comment_ranking"]);
        assert!(cli.policy.is_none());
        assert!(cli.required_fields.is_empty());
        assert!(cli.genres.is_empty());
        assert!(!cli.bom);
    }

    #[test]
    fn test_cli_full() {
        let cli = Cli::parse_from([
            "comment_ranking",
            "-o",
            "/tmp/out",
            "--subdir",
            "comment",
            "--policy",
            "lenient",
            "--on-missing-required",
            "fail-genre",
            "--require",
            "rank",
            "--require",
            "title",
            "--sentinel",
            "na",
            "--bom",
            "--pause-secs",
            "0.5",
            "-g",
            "world",
            "--genre",
            "it-science",
        ]);

        assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.subdir.as_deref(), Some("comment"));
        assert_eq!(cli.policy, Some(FailurePolicy::Lenient));
        assert_eq!(cli.on_missing_required, Some(MissingRequired::FailGenre));
        assert_eq!(cli.required_fields, vec![Field::Rank, Field::Title]);
        assert_eq!(cli.sentinel, Some(SentinelStyle::Na));
        assert!(cli.bom);
        assert_eq!(cli.pause_secs, Some(0.5));
        assert_eq!(cli.genres, vec!["world", "it-science"]);
    }
}
