//! `tender-classifier` — classify procurement tenders into business units.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]): API location, custom keywords,
//!    deadline windows.
//! 3. Run the subcommand:
//!    - `classify` scores one tender offline ([`tender::classifier::classify`]).
//!    - `tenders` fetches tenders and server keywords ([`api`]), classifies
//!      each tender locally and renders a table ([`report`]).
//!    - `stats` counts tenders with urgent and critical deadlines ([`stats`]).
//!    - `keywords` reads or edits the server keyword lists.
//!    - `filter` asks the server to re-classify everything.
//! 4. Exit `0`, or `1` with `tenders --fail-on-mismatch` when any server unit
//!    disagrees with the local classification.

mod api;
mod cli;
mod config;
mod models;
mod report;
mod stats;
mod tender;

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use api::keywords::ServerKeywords;
use cli::{ClassifyArgs, Cli, Command, KeywordsAction, TendersArgs};
use config::{load_config, Config};
use models::{ClassificationInput, ClassifiedTender};
use report::sort_tenders;
use tender::classifier::classify;
use tender::keywords::combine_custom;

const EXAMPLE_TITLE: &str = "Remote Asset Monitoring Solution";
const EXAMPLE_SUMMARY: &str = "We are looking for a solution to monitor our remote assets using smart sensors and IoT technology. The system should provide real-time data and predictive maintenance capabilities.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = load_config(&cwd, cli.config.as_deref())?;
    debug!("using API at {}", config.api.base_url);

    match cli.command {
        Command::Classify(args) => run_classify(&config, args),
        Command::Tenders(args) => run_tenders(&config, args).await,
        Command::Stats { json } => run_stats(&config, json).await,
        Command::Keywords { action } => run_keywords(&config, action).await,
        Command::Filter => run_filter(&config).await,
    }
}

fn run_classify(config: &Config, args: ClassifyArgs) -> Result<()> {
    let (title, summary) = if args.example {
        (EXAMPLE_TITLE.to_string(), EXAMPLE_SUMMARY.to_string())
    } else {
        (args.title, args.summary)
    };

    let from_cli = args.keywords.iter().map(|(unit, spec)| (unit, spec));
    let keywords = if args.no_config_keywords {
        combine_custom(from_cli)
    } else {
        combine_custom(from_cli.chain(config.keywords.iter()))
    };

    let input = keywords
        .into_iter()
        .fold(ClassificationInput::new(title, summary), |input, (unit, spec)| {
            input.with_keywords(unit, spec)
        });
    let result = classify(&input);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::terminal::render_classification(&result, args.explain);
    }
    Ok(())
}

async fn run_tenders(config: &Config, args: TendersArgs) -> Result<()> {
    let client = api::build_client(&config.api)?;

    let (tenders, server_keywords) = if args.offline_keywords {
        let tenders = with_spinner(
            args.quiet,
            "Fetching tenders",
            api::tenders::fetch_tenders(&client, &config.api),
        )
        .await?;
        (tenders, ServerKeywords::default())
    } else {
        with_spinner(args.quiet, "Fetching tenders and keywords", async {
            futures::try_join!(
                api::tenders::fetch_tenders(&client, &config.api),
                api::keywords::fetch_keywords(&client, &config.api),
            )
        })
        .await?
    };

    if !args.quiet {
        eprintln!("  {} {} tenders", "→".cyan(), tenders.len());
    }

    let server_custom = server_keywords.as_custom_keywords();
    let custom = combine_custom(config.keywords.iter().chain(server_custom.iter()));

    let mut rows: Vec<ClassifiedTender> = tenders
        .into_iter()
        .map(|tender| {
            let input = ClassificationInput {
                keywords: custom.clone(),
                ..ClassificationInput::new(&tender.title, tender.classification_text())
            };
            let classification = classify(&input);
            ClassifiedTender {
                tender,
                classification,
            }
        })
        .collect();

    sort_tenders(&mut rows, args.sort, args.order);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        report::terminal::render_tenders(&rows, args.evidence, args.quiet);
    }

    let mismatches = rows.iter().filter(|r| r.is_mismatch()).count();
    info!("{} of {} tenders disagree with the server unit", mismatches, rows.len());

    if args.fail_on_mismatch && mismatches > 0 {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let client = api::build_client(&config.api)?;
    let tenders = with_spinner(
        json,
        "Fetching tenders",
        api::tenders::fetch_tenders(&client, &config.api),
    )
    .await?;

    let stats = stats::compute_stats(&tenders, chrono::Utc::now(), &config.deadlines);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        report::terminal::render_stats(&stats, &config.deadlines);
    }
    Ok(())
}

async fn run_keywords(config: &Config, action: KeywordsAction) -> Result<()> {
    match action {
        KeywordsAction::Defaults => report::terminal::render_defaults(),
        KeywordsAction::Show { json } => {
            let client = api::build_client(&config.api)?;
            let keywords = api::keywords::fetch_keywords(&client, &config.api).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&keywords.units)?);
            } else {
                report::terminal::render_keywords(&keywords);
            }
        }
        KeywordsAction::Add { unit, keyword } => {
            if !unit.is_scorable() {
                anyhow::bail!("the Other unit has no keywords");
            }
            let client = api::build_client(&config.api)?;
            let mut keywords = api::keywords::fetch_keywords(&client, &config.api).await?;
            if keywords.add(unit, &keyword) {
                api::keywords::update_keywords(&client, &config.api, &keywords).await?;
                eprintln!("  {} added '{}' to {}", "✓".green(), keyword.trim(), unit);
            } else {
                eprintln!(
                    "  {} '{}' is empty or already listed for {}",
                    "⚠".yellow(),
                    keyword.trim(),
                    unit
                );
            }
        }
        KeywordsAction::Remove { unit, keyword } => {
            let client = api::build_client(&config.api)?;
            let mut keywords = api::keywords::fetch_keywords(&client, &config.api).await?;
            if keywords.remove(unit, &keyword) {
                api::keywords::update_keywords(&client, &config.api, &keywords).await?;
                eprintln!("  {} removed '{}' from {}", "✓".green(), keyword.trim(), unit);
            } else {
                eprintln!("  {} '{}' is not listed for {}", "⚠".yellow(), keyword.trim(), unit);
            }
        }
    }

    Ok(())
}

async fn run_filter(config: &Config) -> Result<()> {
    let client = api::build_client(&config.api)?;
    let response = with_spinner(
        false,
        "Re-classifying tenders on the server",
        api::filter::trigger_filter(&client, &config.api),
    )
    .await?;

    eprintln!("  {} server re-classification triggered", "✓".green());
    if let Some(body) = response {
        println!("{}", serde_json::to_string_pretty(&body)?);
    }
    Ok(())
}

/// Await `task` behind a stderr spinner unless `quiet`.
async fn with_spinner<T>(quiet: bool, message: &str, task: impl Future<Output = Result<T>>) -> Result<T> {
    if quiet {
        return task.await;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    pb.finish_and_clear();
    result
}
