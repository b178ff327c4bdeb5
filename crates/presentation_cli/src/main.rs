//! Moderation CLI
//!
//! Command-line interface for checking texts and working the review queue.
//! Every command prints JSON on stdout; logs go to stderr.

#![allow(clippy::print_stdout)]

mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use application::{
    ContentSubmission, Evaluation, LexicalClassifier, PiiDetector,
    ports::{Page, RecordFilter},
};
use clap::{Parser, Subcommand};
use domain::{
    AgeAppropriateness, ContentType, ModerationId, ModerationStatus, Reviewer, ReviewerRole,
    UserId,
};
use infrastructure::{AppConfig, LoggingConfig, init_logging, load_tier_table};
use serde::Serialize;
use tracing::warn;

use crate::pipeline::Pipeline;

/// Moderation CLI
#[derive(Parser)]
#[command(name = "moderation-cli")]
#[command(author, version, about = "Content safety pipeline CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "MODERATION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over a text and record the outcome
    ///
    /// Example: moderation-cli check "ti si glup" --content-type message --age 12
    Check {
        /// Text to check
        text: String,

        /// Kind of content
        #[arg(short = 't', long, default_value = "message", value_parser = parse_content_type)]
        content_type: ContentType,

        /// Author age; adds an age-appropriateness verdict
        #[arg(short, long)]
        age: Option<u8>,

        /// Author ID (random when omitted)
        #[arg(long, value_parser = parse_user_id)]
        author: Option<UserId>,

        /// Reference back to the content in the caller's store
        #[arg(long, default_value = "cli")]
        content_ref: String,

        /// Evaluate without writing a moderation record
        #[arg(long)]
        dry_run: bool,
    },

    /// Trim the text and collapse stretched letters and punctuation
    Normalize {
        /// Text to normalize
        text: String,
    },

    /// Replace formal connectives with simpler words
    Simplify {
        /// Text to simplify
        text: String,
    },

    /// Expand common chat abbreviations
    Autocorrect {
        /// Text to correct
        text: String,
    },

    /// Detect and mask personal information
    Pii {
        /// Text to scan
        text: String,
    },

    /// Load and compile a tier table file (.json or .toml)
    ValidateTiers {
        /// Tier table file
        file: PathBuf,
    },

    /// List records awaiting review, oldest first
    Pending {
        /// Only escalated records
        #[arg(long)]
        flagged: bool,

        /// Only records of this content type
        #[arg(short = 't', long, value_parser = parse_content_type)]
        content_type: Option<ContentType>,

        /// Maximum number of records
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Number of records to skip
        #[arg(long, default_value = "0")]
        offset: u32,
    },

    /// Review a pending record
    Review {
        /// Record ID
        #[arg(value_parser = parse_moderation_id)]
        id: ModerationId,

        /// Reviewer user ID
        #[arg(long, value_parser = parse_user_id)]
        reviewer: UserId,

        /// Reviewer role (teacher, moderator, administrator)
        #[arg(long, value_parser = parse_role)]
        role: ReviewerRole,

        /// New status (approved, rejected, flagged)
        #[arg(long, value_parser = parse_status)]
        status: ModerationStatus,

        /// Review notes
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Output of the `check` command
#[derive(Serialize)]
struct CheckReport<'a> {
    tier_table: &'a str,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    age: Option<AgeAppropriateness>,
}

/// Output of the `validate-tiers` command
#[derive(Debug, Serialize, PartialEq, Eq)]
struct TierTableSummary {
    version: String,
    terms: usize,
    patterns: usize,
    exceptions: usize,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn parse_content_type(s: &str) -> Result<ContentType, String> {
    s.parse().map_err(|e: domain::DomainError| e.to_string())
}

fn parse_user_id(s: &str) -> Result<UserId, String> {
    UserId::parse(s).map_err(|e| format!("invalid user ID: {e}"))
}

fn parse_moderation_id(s: &str) -> Result<ModerationId, String> {
    ModerationId::parse(s).map_err(|e| format!("invalid record ID: {e}"))
}

fn parse_role(s: &str) -> Result<ReviewerRole, String> {
    ReviewerRole::from_name(s).ok_or_else(|| {
        format!("unknown role '{s}' (expected teacher, moderator or administrator)")
    })
}

fn parse_status(s: &str) -> Result<ModerationStatus, String> {
    match ModerationStatus::from_name(s) {
        Some(status) if status.is_terminal() => Ok(status),
        _ => Err(format!(
            "invalid status '{s}' (expected approved, rejected or flagged)"
        )),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    // Reject a bad logging.filter before it reaches the subscriber
    let warnings = config.validate()?;

    let logging = if cli.verbose > 0 {
        LoggingConfig {
            filter: log_filter_from_verbosity(cli.verbose).to_string(),
            ..config.logging.clone()
        }
    } else {
        config.logging.clone()
    };
    init_logging(&logging)?;

    for warning in warnings {
        warn!(%warning, "Configuration warning");
    }

    match cli.command {
        Commands::Normalize { text } => {
            print_json(&serde_json::json!({ "text": application::normalize(&text) }))?;
        },

        Commands::Simplify { text } => {
            print_json(&serde_json::json!({ "text": application::simplify(&text) }))?;
        },

        Commands::Autocorrect { text } => {
            print_json(&serde_json::json!({ "text": application::autocorrect(&text) }))?;
        },

        Commands::Pii { text } => {
            let result = PiiDetector::new()?.detect(&text);
            let warning = application::generate_warning(&result.types);
            print_json(&serde_json::json!({ "result": result, "warning": warning }))?;
        },

        Commands::ValidateTiers { file } => {
            let table = load_tier_table(&file)?;
            let summary = TierTableSummary {
                version: table.version.clone(),
                terms: table.terms.len(),
                patterns: table.patterns.len(),
                exceptions: table.exceptions.len(),
            };
            // Compiling catches bad regexes the structural checks cannot
            LexicalClassifier::new(table)?;
            print_json(&summary)?;
        },

        Commands::Check {
            text,
            content_type,
            age,
            author,
            content_ref,
            dry_run,
        } => {
            let pipeline = Pipeline::build(&config).await?;

            let evaluation = if dry_run {
                pipeline.moderation.assess(&text)
            } else {
                let submission = ContentSubmission {
                    text: text.clone(),
                    content_type,
                    content_ref,
                    author_id: author.unwrap_or_default(),
                };
                pipeline.moderation.evaluate(&submission).await?
            };
            let age = age.map(|age| pipeline.age.is_appropriate(&text, age));

            print_json(&CheckReport {
                tier_table: pipeline.classifier.version(),
                evaluation: &evaluation,
                age,
            })?;
            pipeline.shutdown().await;
        },

        Commands::Pending {
            flagged,
            content_type,
            limit,
            offset,
        } => {
            let pipeline = Pipeline::build(&config).await?;

            let mut filter = RecordFilter::new();
            if flagged {
                filter = filter.with_flagged(true);
            }
            if let Some(content_type) = content_type {
                filter = filter.with_content_type(content_type);
            }
            let records = pipeline
                .records
                .list_pending(filter, Page::new(limit, offset))
                .await?;

            print_json(&records)?;
            pipeline.shutdown().await;
        },

        Commands::Review {
            id,
            reviewer,
            role,
            status,
            notes,
        } => {
            let pipeline = Pipeline::build(&config).await?;

            let record = pipeline
                .records
                .review(&id, Reviewer::new(reviewer, role), status, notes)
                .await?;

            print_json(&record)?;
            pipeline.shutdown().await;
        },
    }

    Ok(())
}
