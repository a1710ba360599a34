use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::{KeywordSpec, Unit};
use crate::report::{SortDirection, SortField};

#[derive(Parser, Debug)]
#[command(
    name = "tender-classifier",
    about = "Classify procurement tenders into business units by keyword evidence",
    version
)]
pub struct Cli {
    /// Config file [default: ./.tender-classifier/config.toml, fallback ~/.config/tender-classifier/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a single tender from its title and summary
    Classify(ClassifyArgs),
    /// Fetch tenders from the API and classify each one locally
    Tenders(TendersArgs),
    /// Show deadline statistics for the current tenders
    Stats {
        /// Print JSON instead of a summary box
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit the server keyword configuration
    Keywords {
        #[command(subcommand)]
        action: KeywordsAction,
    },
    /// Ask the server to re-classify every tender
    Filter,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Tender title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Tender summary
    #[arg(long, default_value = "")]
    pub summary: String,

    /// Use the built-in sample tender as title and summary
    #[arg(long, conflicts_with_all = ["title", "summary"])]
    pub example: bool,

    /// Extra keywords for a unit, e.g. `Marine=boat,harbour` (repeatable)
    #[arg(short, long = "keyword", value_name = "UNIT=LIST", value_parser = parse_unit_keywords)]
    pub keywords: Vec<(Unit, KeywordSpec)>,

    /// Ignore keywords from the config file
    #[arg(long)]
    pub no_config_keywords: bool,

    /// Show per-unit scores and matched keywords
    #[arg(long)]
    pub explain: bool,

    /// Print the full result as JSON
    #[arg(long, conflicts_with = "explain")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TendersArgs {
    /// Column to order by
    #[arg(long, default_value = "none", value_name = "FIELD")]
    pub sort: SortField,

    /// Sort direction
    #[arg(long, default_value = "desc", value_name = "DIR")]
    pub order: SortDirection,

    /// Classify with built-in and config keywords only, ignoring the server's
    #[arg(long)]
    pub offline_keywords: bool,

    /// Print classified tenders as JSON
    #[arg(long)]
    pub json: bool,

    /// Show the matched keywords behind each local unit
    #[arg(long)]
    pub evidence: bool,

    /// Only print a summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with code 1 when a server unit disagrees with the local one
    #[arg(long)]
    pub fail_on_mismatch: bool,
}

#[derive(Subcommand, Debug)]
pub enum KeywordsAction {
    /// Print the server keyword configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add a related keyword to a unit and save it
    Add {
        unit: Unit,
        keyword: String,
    },
    /// Remove a related keyword from a unit and save it
    Remove {
        unit: Unit,
        keyword: String,
    },
    /// Print the built-in keyword tables
    Defaults,
}

/// Parse `UNIT=LIST` where LIST is comma, pipe or newline delimited.
fn parse_unit_keywords(raw: &str) -> Result<(Unit, KeywordSpec), String> {
    let (unit, list) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected UNIT=KEYWORDS, got '{}'", raw))?;
    let unit: Unit = unit.parse()?;
    if !unit.is_scorable() {
        return Err("Other has no keywords".to_string());
    }
    Ok((unit, KeywordSpec::Delimited(list.to_string())))
}
