//! # Outreach CLI Application
//!
//! Command-line front end for crawling company websites and drafting
//! personalized outreach emails.
//!
//! ## Subcommands
//!
//! - `crawl`: Crawl a site and print the aggregated company summary
//! - `draft`: Draft an email from a URL or a saved summary file
//! - `regenerate`: Redraft a previous email using review comments
//! - `record-edit`: Save the user's revision of a draft to the edit history
//! - `history`: Show recently recorded edits
//!
//! Logs go to stderr (filtered by `RUST_LOG`); drafts and summaries go to stdout.

mod telemetry;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use outreach::crawler::{CompanyInfo, Crawler, CrawlerConfig};
use outreach::drafting::{failure_message, DraftingConfig, EmailDrafter};
use outreach::model::{Client, LanguageModel};
use outreach::refinement::{EditLogStore, RefinementConfig, RefinementEngine, StorageConfig};
use serde::Serialize;
use tracing::instrument;

#[derive(Parser)]
#[command(author, version, about = "Draft personalized outreach emails from a company's website", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Language model provider
    #[arg(long, value_enum, global = true, default_value_t = Provider::Openai)]
    provider: Provider,

    /// Model name (defaults to the provider's default model)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Edit history file
    #[arg(long, global = true, default_value = ".outreach/edit_history.json")]
    history: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a company website and print the aggregated summary
    Crawl(CrawlArgs),

    /// Draft an outreach email for a company
    Draft(DraftArgs),

    /// Redraft an email using review comments
    Regenerate(RegenerateArgs),

    /// Record the user's revision of a generated draft
    RecordEdit(RecordEditArgs),

    /// Show recently recorded edits
    History(HistoryArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Provider {
    Openai,
    Gemini,
}

#[derive(Args, Debug, Clone)]
struct CrawlOptions {
    /// Crawl depth; 1 fetches only the seed page
    #[arg(short, long, default_value = "2")]
    depth: u32,

    /// Links followed per page
    #[arg(short = 'l', long, default_value = "3")]
    links_per_page: usize,

    /// Delay between page fetches in milliseconds
    #[arg(long, default_value = "500")]
    delay_ms: u64,

    /// URL keywords to skip (comma-separated, case-insensitive)
    #[arg(short, long, default_value = "webinar,podcast,blog")]
    exclude: String,
}

impl CrawlOptions {
    fn config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .max_depth(self.depth)
            .max_links_per_page(self.links_per_page)
            .delay_ms(self.delay_ms)
            .excluded_keywords(
                self.exclude
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            )
            .build()
    }
}

#[derive(Args, Debug, Clone)]
struct SenderOptions {
    /// Name used to sign the email
    #[arg(long)]
    sender: Option<String>,

    /// Fund the sender writes for
    #[arg(long)]
    firm: Option<String>,
}

impl SenderOptions {
    fn config(&self) -> DraftingConfig {
        let mut builder = DraftingConfig::builder();
        if let Some(sender) = &self.sender {
            builder = builder.sender_name(sender.as_str());
        }
        if let Some(firm) = &self.firm {
            builder = builder.firm_name(firm.as_str());
        }
        builder.build()
    }
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// URL to crawl
    #[arg(required = true)]
    url: String,

    #[command(flatten)]
    crawl: CrawlOptions,

    /// Save the crawl report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DraftArgs {
    /// Company URL to crawl, or a file holding a saved company summary
    #[arg(required = true)]
    source: String,

    #[command(flatten)]
    crawl: CrawlOptions,

    #[command(flatten)]
    sender: SenderOptions,

    /// Also save the draft to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RegenerateArgs {
    /// Company URL to crawl, or a file holding a saved company summary
    #[arg(required = true)]
    source: String,

    /// File holding the previous draft
    #[arg(long, required = true)]
    draft: PathBuf,

    /// Review comments to address
    #[arg(short, long, required = true)]
    comments: String,

    #[command(flatten)]
    crawl: CrawlOptions,

    #[command(flatten)]
    sender: SenderOptions,

    /// Also save the new draft to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RecordEditArgs {
    /// File holding the draft as generated
    #[arg(long, required = true)]
    original: PathBuf,

    /// File holding the draft as the user edited it
    #[arg(long, required = true)]
    edited: PathBuf,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// Number of recent edits to show
    #[arg(short, long, default_value = "10")]
    limit: usize,
}

/// JSON written by `crawl --output`
#[derive(Serialize)]
struct CrawlOutput<'a> {
    url: &'a str,
    company_info: &'a CompanyInfo,
    visited: Vec<&'a str>,
    fetch_attempts: usize,
    stopped_early: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber()?;

    let Some(command) = cli.command else {
        let _ = Cli::parse_from(["outreach", "--help"]);
        return Ok(());
    };

    match command {
        Commands::RecordEdit(args) => record_edit_command(args, &cli.history).await,
        Commands::History(args) => history_command(args, &cli.history).await,
        command => match cli.provider {
            Provider::Openai => {
                let client = Client::new_openai_from_env(cli.model.as_deref())?;
                run_with_model(client, command, &cli.history).await
            }
            Provider::Gemini => {
                let client = Client::new_gemini_from_env(cli.model.as_deref())?;
                run_with_model(client, command, &cli.history).await
            }
        },
    }
}

/// Run a subcommand that needs a language model
async fn run_with_model<M>(model: M, command: Commands, history: &Path) -> anyhow::Result<()>
where
    M: LanguageModel + Clone,
{
    match command {
        Commands::Crawl(args) => crawl_command(model, args).await,
        Commands::Draft(args) => draft_command(model, args, history).await,
        Commands::Regenerate(args) => regenerate_command(model, args, history).await,
        Commands::RecordEdit(_) | Commands::History(_) => {
            anyhow::bail!("command does not use a language model")
        }
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn refinement_engine(history: &Path) -> RefinementEngine {
    RefinementEngine::new(
        EditLogStore::with_config(StorageConfig {
            path: history.to_path_buf(),
        }),
        RefinementConfig::default(),
    )
}

/// Crawl `source` when it is a URL, otherwise read a saved summary from disk
async fn load_company_info<M>(
    model: M,
    source: &str,
    options: &CrawlOptions,
) -> anyhow::Result<CompanyInfo>
where
    M: LanguageModel,
{
    if source.starts_with("http") {
        let crawler = Crawler::new(model, options.config())?;
        let progress = spinner(format!("Crawling {}...", source));
        let company_info = crawler.crawl(source).await;
        progress.finish_and_clear();
        if company_info.is_empty() {
            eprintln!("No usable content found at {}", source);
        }
        Ok(company_info)
    } else {
        let text = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("failed to read company summary from {}", source))?;
        Ok(CompanyInfo::new(text.trim()))
    }
}

async fn emit_draft(draft: &str, output: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", draft);
    if let Some(path) = output {
        tokio::fs::write(path, draft).await?;
        eprintln!("Saved draft to {}", path.display());
    }
    Ok(())
}

#[instrument(skip(model))]
async fn crawl_command<M>(model: M, args: CrawlArgs) -> anyhow::Result<()>
where
    M: LanguageModel,
{
    let crawler = Crawler::new(model, args.crawl.config())?;

    let progress = spinner(format!("Crawling {}...", args.url));
    let report = crawler.crawl_with_report(&args.url).await;
    progress.finish_and_clear();

    eprintln!(
        "Visited {} pages ({} fetch attempts)",
        report.visited.len(),
        report.fetch_attempts
    );
    println!("{}", report.company_info);

    if let Some(output_file) = args.output {
        let output = CrawlOutput {
            url: &args.url,
            company_info: &report.company_info,
            visited: report.visited.iter().map(|u| u.as_str()).collect(),
            fetch_attempts: report.fetch_attempts,
            stopped_early: report.stopped_early,
        };
        let json = serde_json::to_string_pretty(&output)?;
        tokio::fs::write(&output_file, json).await?;
        eprintln!("Saved crawl report to {}", output_file.display());
    }

    Ok(())
}

#[instrument(skip(model))]
async fn draft_command<M>(model: M, args: DraftArgs, history: &Path) -> anyhow::Result<()>
where
    M: LanguageModel + Clone,
{
    let company_info = load_company_info(model.clone(), &args.source, &args.crawl).await?;
    let drafter = EmailDrafter::new(model, refinement_engine(history), args.sender.config());

    let progress = spinner("Drafting email...".to_string());
    let result = drafter.draft(&company_info).await;
    progress.finish_and_clear();

    match result {
        Ok(draft) => emit_draft(&draft, args.output.as_deref()).await,
        Err(e) => anyhow::bail!(failure_message(&e)),
    }
}

#[instrument(skip(model))]
async fn regenerate_command<M>(
    model: M,
    args: RegenerateArgs,
    history: &Path,
) -> anyhow::Result<()>
where
    M: LanguageModel + Clone,
{
    let prior_draft = tokio::fs::read_to_string(&args.draft)
        .await
        .with_context(|| format!("failed to read previous draft from {}", args.draft.display()))?;
    let company_info = load_company_info(model.clone(), &args.source, &args.crawl).await?;
    let drafter = EmailDrafter::new(model, refinement_engine(history), args.sender.config());

    let progress = spinner("Regenerating email...".to_string());
    let result = drafter
        .regenerate(&prior_draft, &company_info, &args.comments)
        .await;
    progress.finish_and_clear();

    match result {
        Ok(draft) => emit_draft(&draft, args.output.as_deref()).await,
        Err(e) => anyhow::bail!(failure_message(&e)),
    }
}

#[instrument]
async fn record_edit_command(args: RecordEditArgs, history: &Path) -> anyhow::Result<()> {
    let original = tokio::fs::read_to_string(&args.original)
        .await
        .with_context(|| format!("failed to read {}", args.original.display()))?;
    let edited = tokio::fs::read_to_string(&args.edited)
        .await
        .with_context(|| format!("failed to read {}", args.edited.display()))?;

    let engine = refinement_engine(history);
    match engine.append_edit(&original, &edited).await? {
        Some(record) => println!(
            "Recorded edit ({} diff lines) to {}",
            record.diff.lines().count(),
            history.display()
        ),
        None => println!("No changes between the drafts; nothing recorded"),
    }

    Ok(())
}

#[instrument]
async fn history_command(args: HistoryArgs, history: &Path) -> anyhow::Result<()> {
    let log = refinement_engine(history).load_history().await;
    if log.is_empty() {
        println!("No edits recorded in {}", history.display());
        return Ok(());
    }

    let recent = log.recent(args.limit);
    println!(
        "Showing {} of {} recorded edits (oldest first)",
        recent.len(),
        log.len()
    );
    for (i, record) in recent.iter().enumerate() {
        let when = record
            .recorded_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!("\nEdit {} ({}):\n{}", i + 1, when, record.diff.trim_end());
    }

    Ok(())
}
