//! Command implementations for the AtoN notation CLI
//!
//! Dispatches subcommands, sets up logging and renders decode results and
//! import reports for humans or as JSON.

use crate::batch::{BatchDecoder, ChangesetCounter, ImportReport, NotationDecoders};
use crate::cli::args::{Args, Commands, DecodeArgs, ImportArgs, OutputFormat, VocabularyArgs};
use crate::io::{read_notation_rows, write_tag_table};
use crate::models::{DecodedNotation, NotationKind, StructureClass};
use crate::tags::{AtonTag, ToAtonTags};
use crate::validity::{Outcome, Validity};
use crate::vocabulary::Vocabulary;
use anyhow::{Context, Result};
use colored::*;
use indicatif::HumanDuration;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info};

/// How a command finished when it did not fail outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    /// Strict mode and at least one notation needs manual review
    NeedsReview,
}

/// Main command runner
pub async fn run(args: Args) -> Result<CommandStatus> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let vocabulary = load_vocabulary(&args)?;

    match &args.command {
        Commands::Decode(decode_args) => run_decode(decode_args, &vocabulary),
        Commands::Import(import_args) => {
            run_import(import_args, &vocabulary, args.show_progress()).await
        }
        Commands::Vocabulary(vocabulary_args) => run_vocabulary(vocabulary_args, &vocabulary),
    }
}

/// Set up structured logging
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aton_notation={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialise logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn load_vocabulary(args: &Args) -> Result<Vocabulary> {
    match &args.vocabulary {
        Some(path) => {
            let vocabulary = Vocabulary::from_json_file(path)
                .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?;
            info!(
                "Using vocabulary version {} from {}",
                vocabulary.version,
                path.display()
            );
            Ok(vocabulary)
        }
        None => Ok(Vocabulary::default()),
    }
}

/// One decoded command-line notation, as rendered to JSON
#[derive(Debug, Serialize)]
struct DecodeResult<'a> {
    input: &'a str,
    outcome: Outcome,
    valid: bool,
    record: DecodedNotation,
    tags: Vec<AtonTag>,
}

fn run_decode(args: &DecodeArgs, vocabulary: &Vocabulary) -> Result<CommandStatus> {
    let decoders = NotationDecoders::new(vocabulary).context("Invalid vocabulary")?;
    let kind = NotationKind::from(args.kind);

    let results: Vec<DecodeResult<'_>> = args
        .notations
        .iter()
        .map(|input| {
            let record = decoders.decode(kind, input);
            let tags = match &record {
                DecodedNotation::DesignCode(design_code) => {
                    design_code.to_tags_as(args.structure_class())
                }
                other => other.to_tags(),
            };
            DecodeResult {
                input,
                outcome: record.outcome(),
                valid: record.is_valid(),
                record,
                tags,
            }
        })
        .collect();

    match args.output_format {
        OutputFormat::Human => {
            for result in &results {
                print_decode_result(result, args.structure_class());
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results)
                .context("Failed to serialize decode results")?;
            println!("{}", json);
        }
    }
    Ok(CommandStatus::Success)
}

fn outcome_label(outcome: Outcome) -> ColoredString {
    match outcome {
        Outcome::Full => outcome.to_string().bright_green().bold(),
        Outcome::Partial => outcome.to_string().bright_yellow().bold(),
        Outcome::NoMatch => outcome.to_string().bright_red().bold(),
    }
}

fn print_decode_result(result: &DecodeResult<'_>, structure_class: StructureClass) {
    let kind = match (result.record.kind(), structure_class) {
        (NotationKind::DesignCode, StructureClass::Beacon) => "design_code (beacon)".to_string(),
        (kind, _) => kind.to_string(),
    };
    println!(
        "{} {} [{}]",
        result.input.bright_cyan().bold(),
        format!("({})", kind).bright_black(),
        outcome_label(result.outcome)
    );

    if result.tags.is_empty() {
        println!("   {}", "no tags".bright_black());
    }
    for tag in &result.tags {
        println!("   {}", tag);
    }
    println!();
}

async fn run_import(
    args: &ImportArgs,
    vocabulary: &Vocabulary,
    show_progress: bool,
) -> Result<CommandStatus> {
    let start_time = Instant::now();
    args.validate()?;

    let config = args.to_config(show_progress);
    let columns = config.columns.clone();
    let input = args.input.clone();
    info!("Reading notation rows from {}", input.display());

    let rows = task::spawn_blocking(move || read_notation_rows(&input, &columns))
        .await
        .context("Reading task failed")?
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let changesets = Arc::new(ChangesetCounter::starting_after(args.changeset_after));
    let compression = config.compression;
    let decoder = BatchDecoder::new(vocabulary, config, changesets)
        .context("Failed to set up batch decoder")?;
    let output = decoder.decode_rows(rows).await?;

    let mut written = None;
    if let Some(path) = &args.output {
        let format = args
            .table_format()
            .context("Output format could not be determined")?;
        let count = write_tag_table(&output.rows, path, format, compression)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written = Some((path.clone(), count));
    }

    let elapsed = start_time.elapsed();
    match args.output_format {
        OutputFormat::Human => print_import_report(&output.report, written.as_ref(), elapsed),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&output.report)
                .context("Failed to serialize import report")?;
            println!("{}", json);
        }
    }

    if args.strict && !output.report.issues.is_empty() {
        Ok(CommandStatus::NeedsReview)
    } else {
        Ok(CommandStatus::Success)
    }
}

fn print_import_report(
    report: &ImportReport,
    written: Option<&(std::path::PathBuf, usize)>,
    elapsed: Duration,
) {
    println!();
    println!("{}", "AtoN Import Complete".bright_green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   • Changeset: {}", report.changeset);
    println!(
        "   • Started: {}",
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "   • Rows read: {} ({} without notations)",
        report.rows_read, report.rows_empty
    );
    println!("   • Notations decoded: {}", report.notations_decoded);
    println!(
        "   • Outcomes: {} full, {} partial, {} no match ({:.1}% valid)",
        report.full.to_string().bright_green(),
        report.partial.to_string().bright_yellow(),
        report.no_match.to_string().bright_red(),
        report.success_rate()
    );
    if let Some((path, count)) = written {
        println!("   • Output: {} ({} records)", path.display(), count);
    }
    println!("   • Processing time: {}", HumanDuration(elapsed));

    if !report.issues.is_empty() {
        println!();
        println!(
            "{}",
            format!("{} notations need manual review:", report.issues.len())
                .bright_yellow()
                .bold()
        );
        for issue in &report.issues {
            println!(
                "   {} {} {} '{}' [{}]",
                format!("row {}", issue.row).bright_white(),
                issue
                    .name
                    .as_deref()
                    .map(|name| format!("({})", name))
                    .unwrap_or_default()
                    .bright_black(),
                issue.kind,
                issue.raw,
                outcome_label(issue.outcome)
            );
        }
    }
    println!();
}

fn run_vocabulary(args: &VocabularyArgs, vocabulary: &Vocabulary) -> Result<CommandStatus> {
    vocabulary.validate().context("Invalid vocabulary")?;
    let json = vocabulary
        .to_json_pretty()
        .context("Failed to serialize vocabulary")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote vocabulary to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_vocabulary_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vocabulary.json");
        let args = Args::parse_from([
            "aton-notation",
            "vocabulary",
            "-o",
            path.to_str().unwrap(),
        ]);
        let Commands::Vocabulary(vocabulary_args) = &args.command else {
            panic!("expected vocabulary command");
        };

        let status = run_vocabulary(vocabulary_args, &Vocabulary::default()).unwrap();
        assert_eq!(status, CommandStatus::Success);
        let loaded = Vocabulary::from_json_file(&path).unwrap();
        assert_eq!(loaded, Vocabulary::default());
    }

    #[test]
    fn test_decode_command_succeeds_on_noise() {
        let args = Args::parse_from([
            "aton-notation",
            "decode",
            "design",
            "2S5NC/B",
            "???",
            "--format",
            "json",
        ]);
        let Commands::Decode(decode_args) = &args.command else {
            panic!("expected decode command");
        };
        assert_eq!(
            run_decode(decode_args, &Vocabulary::default()).unwrap(),
            CommandStatus::Success
        );
    }

    #[tokio::test]
    async fn test_strict_import_flags_review() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("sheet.csv");
        std::fs::write(&input, "name,character\nA,Fl.W.5s\nB,W.R 5s\n").unwrap();
        let output = dir.path().join("tags.csv");

        let args = Args::parse_from([
            "aton-notation",
            "import",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--strict",
            "--format",
            "json",
        ]);
        let Commands::Import(import_args) = &args.command else {
            panic!("expected import command");
        };

        let status = run_import(import_args, &Vocabulary::default(), false)
            .await
            .unwrap();
        assert_eq!(status, CommandStatus::NeedsReview);
        assert!(output.exists());
    }
}
