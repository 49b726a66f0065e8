//! Command-line interface for finanz-analyst
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//!
//! # Analyze a company with the live provider
//! finanz-analyst analyze "Siemens"
//!
//! # Re-run the pipeline on a saved provider response
//! finanz-analyst parse --input response.txt --sources chunks.json
//! cat response.txt | finanz-analyst parse --input - --json
//! ```

mod render;

use analyst_core::{
    AnalysisError, AnalysisPipeline, AnalysisRecord, AnalystConfig, ExtractionMode,
    StockAnalyzer,
};
use analyst_llm::GroundingChunk;
use analyst_llm::providers::{GeminiConfig, GeminiProvider};
use analyst_utils::{LogConfig, LogFormat, init_tracing};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

const VERBOSE_FILTER: &str = "warn,analyst_core=debug,analyst_llm=debug,finanz_analyst=debug";

#[derive(Parser, Debug)]
#[command(name = "finanz-analyst", version)]
#[command(about = "Grounded stock analysis with a 0-150 recommendation score", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    /// Log pipeline stages at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a company by name or ticker
    Analyze {
        /// Company name or ticker, e.g. "Siemens" or "SAP"
        query: String,

        /// Provider model, overrides GEMINI_MODEL
        #[arg(long)]
        model: Option<String>,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process a saved provider response
    Parse {
        /// File with the raw response text, `-` for stdin
        #[arg(long)]
        input: PathBuf,

        /// JSON array of grounding chunks
        #[arg(long)]
        sources: Option<PathBuf>,

        /// Recover an object surrounded by prose
        #[arg(long)]
        balanced: bool,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().with_format(cli.log_format);
    if cli.verbose {
        log_config = log_config.with_default_filter(VERBOSE_FILTER);
    }
    init_tracing(&log_config);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AnalysisError>() {
                Some(analysis) => eprintln!("{}", analysis.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze { query, model, json } => {
            let mut builder = AnalystConfig::builder().with_env_model();
            if let Some(model) = model {
                builder = builder.model(model);
            }
            let config = builder.build()?;

            let gemini = GeminiConfig::from_env()?.with_timeout(config.request_timeout.as_secs());
            let provider = Arc::new(GeminiProvider::with_config(gemini)?);
            debug!(api_base = %provider.config().api_base, "Gemini provider ready");

            let analyzer = StockAnalyzer::new(provider, Arc::new(config))?;
            info!(model = %analyzer.config().model, "Starting analysis");
            let record = analyzer.analyze(&query).await?;
            print_record(&record, json)
        }
        Command::Parse {
            input,
            sources,
            balanced,
            json,
        } => {
            let raw = read_input(&input)?;
            let chunks = match sources {
                Some(path) => read_chunks(&path)?,
                None => Vec::new(),
            };
            debug!(bytes = raw.len(), chunks = chunks.len(), "Loaded saved response");

            let extraction = if balanced {
                ExtractionMode::Balanced
            } else {
                ExtractionMode::Fenced
            };
            let config = AnalystConfig::builder().extraction(extraction).build()?;

            let record = AnalysisPipeline::from_config(&config).process(&raw, &chunks)?;
            print_record(&record, json)
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read response from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn read_chunks(path: &Path) -> anyhow::Result<Vec<GroundingChunk>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of grounding chunks", path.display()))
}

fn print_record(record: &AnalysisRecord, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("{}", render::render_record(record));
    }
    Ok(())
}
