//! careerflow — scrape job postings and turn them into structured records.
//!
//! Two subcommands:
//! - `scrape`: crawl a job board search, run each batch through the model,
//!   cache results by job id and export everything to CSV.
//! - `evaluate`: re-extract the raw texts from a labelled CSV and score the
//!   predictions field by field against the ground truth.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jd_extraction::{
    export, models, Evaluator, JdExtractor, JobBoardScraper, JobCache, Pipeline, PromptSet,
    ScrapeConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "careerflow", version, about = "Job posting scraper and structured extractor")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape job postings, extract structured records and export to CSV
    Scrape(ScrapeArgs),
    /// Score extraction quality against a labelled CSV
    Evaluate(EvaluateArgs),
}

#[derive(Args)]
struct ScrapeArgs {
    /// Search keywords
    #[arg(long, default_value = "Machine learning engineer")]
    title: String,

    /// Search location
    #[arg(long, default_value = "Paris")]
    location: String,

    /// Maximum number of result pages to walk
    #[arg(long, default_value_t = 5)]
    max_pages: usize,

    /// Pause between detail-page fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Number of postings per model call
    #[arg(long, default_value_t = 5)]
    batch_size: usize,

    /// Directory with prompt template overrides
    #[arg(long)]
    prompt_dir: Option<PathBuf>,

    /// Model backend to use
    #[arg(long, default_value = "gemini-2.0-flash")]
    llm: String,

    /// Path of the extraction cache
    #[arg(long, default_value = "cache/job_cache.json")]
    cache: PathBuf,

    /// Path of the raw scrape cache; omit to skip saving raw pages
    #[arg(long)]
    raw_cache: Option<PathBuf>,

    /// Read postings from the raw cache instead of the network
    #[arg(long)]
    load_from_cache: bool,

    /// Translate postings to English before extraction
    #[arg(long)]
    use_translation: bool,

    /// Keep the raw posting text on each exported record
    #[arg(long)]
    save_raw_job_text: bool,

    /// Output CSV path
    #[arg(long, default_value = "scraped_jobs.csv")]
    output: PathBuf,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Labelled CSV with a raw_job_text column and ground-truth columns
    #[arg(long)]
    input_csv: PathBuf,

    /// Directory with prompt template overrides
    #[arg(long)]
    prompt_dir: Option<PathBuf>,

    /// Model backend to use
    #[arg(long, default_value = "gemini-2.0-flash")]
    llm: String,

    /// Number of postings per model call
    #[arg(long, default_value_t = 5)]
    batch_size: usize,

    /// Dotted field paths to score
    #[arg(long, value_delimiter = ',', default_values_t = [
        "skills.hard_skills".to_string(),
        "skills.soft_skills".to_string(),
        "skills.required_languages".to_string(),
        "skills.nice_to_have".to_string(),
    ])]
    fields: Vec<String>,

    /// Also write the model's predictions to a CSV
    #[arg(long)]
    save_output: bool,

    /// Predictions CSV path
    #[arg(long, default_value = "eval_predictions.csv")]
    output_csv: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jd_extraction=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Scrape(args) => run_scrape(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
    }
}

fn load_prompts(prompt_dir: Option<&PathBuf>) -> Result<PromptSet> {
    match prompt_dir {
        Some(dir) => PromptSet::from_dir(dir)
            .with_context(|| format!("failed to load prompts from {}", dir.display())),
        None => Ok(PromptSet::default()),
    }
}

async fn run_scrape(args: ScrapeArgs) -> Result<()> {
    let prompts = load_prompts(args.prompt_dir.as_ref())?;
    let model = models::from_name(&args.llm, prompts)
        .with_context(|| format!("failed to initialize model backend '{}'", args.llm))?;

    let mut config = ScrapeConfig::new(&args.title, &args.location)
        .with_max_pages(args.max_pages)
        .with_batch_size(args.batch_size)
        .with_delay(Duration::from_millis(args.delay_ms))
        .load_from_cache(args.load_from_cache);
    if let Some(path) = &args.raw_cache {
        config = config.with_raw_cache(path);
    }

    let mut scraper = JobBoardScraper::new(config);
    scraper.collect().await.context("scraping failed")?;
    tracing::info!(jobs = scraper.len(), "collected job postings");

    let cache = JobCache::open(&args.cache)
        .with_context(|| format!("failed to open cache at {}", args.cache.display()))?;
    let extractor =
        JdExtractor::new(Arc::new(model)).with_translation(args.use_translation);
    let mut pipeline =
        Pipeline::new(extractor, cache).with_raw_job_text(args.save_raw_job_text);

    let records = pipeline.run(&scraper.batches()).await?;

    export::write_csv(&args.output, &records)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!(
        records = records.len(),
        output = %args.output.display(),
        "export complete"
    );
    Ok(())
}

async fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let prompts = load_prompts(args.prompt_dir.as_ref())?;
    let model = models::from_name(&args.llm, prompts)
        .with_context(|| format!("failed to initialize model backend '{}'", args.llm))?;
    let extractor = JdExtractor::new(Arc::new(model));

    let (texts, ground_truths) = export::read_eval_csv(&args.input_csv)
        .with_context(|| format!("failed to read {}", args.input_csv.display()))?;
    tracing::info!(documents = texts.len(), "loaded evaluation corpus");

    let mut records = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(args.batch_size.max(1)) {
        let batch = extractor.extract_batch(chunk).await?;
        records.extend(batch);
    }

    let predictions = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;

    let evaluator = Evaluator::new(args.fields.clone());
    let results = evaluator.evaluate_batch(&ground_truths, &predictions)?;

    println!("{:<32} {:>10} {:>10} {:>10}", "field", "precision", "recall", "f1");
    for (field, scores) in &results {
        println!(
            "{:<32} {:>10.3} {:>10.3} {:>10.3}",
            field, scores.precision, scores.recall, scores.f1
        );
        tracing::info!(
            field,
            precision = scores.precision,
            recall = scores.recall,
            f1 = scores.f1,
            "field metrics"
        );
    }

    if args.save_output {
        export::write_csv(&args.output_csv, &records)
            .with_context(|| format!("failed to write {}", args.output_csv.display()))?;
        tracing::info!(output = %args.output_csv.display(), "predictions saved");
    }
    Ok(())
}
