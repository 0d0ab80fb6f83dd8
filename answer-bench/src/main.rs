//! Answer Benchmark CLI

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use answer_bench::{
    analysis::{BenchmarkReport, Evaluator, ScorePolicy},
    config::Config,
    extract::{extract_labeled, extract_positional, Extraction},
    gold::{GoldError, GoldSet},
    providers::{CompletionRequest, LLMProvider, LmStudioClient, Message},
    reporting::{print_benchmark_report, print_iteration_report, print_scored_lines, JsonSummary},
    runner::{Executor, ExecutorConfig},
};

#[derive(Parser)]
#[command(name = "answer-bench")]
#[command(about = "Fuzzy-scoring answer accuracy benchmark for local LLM endpoints")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark against a model
    Run {
        /// Model name to benchmark
        #[arg(short, long)]
        model: String,

        /// Base URL for the endpoint (default: http://localhost:1234/v1)
        #[arg(long)]
        base_url: Option<String>,

        /// Prompt file sent to the model
        #[arg(short, long, default_value = "prompt.md")]
        prompt: PathBuf,

        /// Expected answers file (defaults to the built-in reference set)
        #[arg(short, long)]
        gold: Option<PathBuf>,

        /// Number of benchmark iterations
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save each raw model response under the run directory
        #[arg(long)]
        save_responses: bool,
    },

    /// Score an existing response from a file or stdin
    Score {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Expected answers file (defaults to the built-in reference set)
        #[arg(short, long)]
        gold: Option<PathBuf>,

        /// Extract labeled `Q<id>:` lines instead of scoring every
        /// non-empty line positionally
        #[arg(long)]
        labeled: bool,
    },

    /// List models served by the endpoint
    Models {
        /// Base URL for the endpoint (default: http://localhost:1234/v1)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/answer-bench.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("answer_bench=debug,info")
    } else {
        EnvFilter::new("answer_bench=info,warn")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Run {
            model,
            base_url,
            prompt,
            gold,
            iterations,
            output,
            save_responses,
        } => {
            run_benchmark(
                &config,
                model,
                base_url,
                prompt,
                gold,
                iterations,
                output,
                save_responses,
            )
            .await?;
        }

        Commands::Score {
            input,
            gold,
            labeled,
        } => {
            score_input(&config, input, gold, labeled)?;
        }

        Commands::Models { base_url } => {
            list_models(&config, base_url).await?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn load_gold(path: &Option<PathBuf>) -> Result<GoldSet, GoldError> {
    match path {
        Some(p) => GoldSet::from_file(p),
        None => Ok(GoldSet::reference()),
    }
}

fn build_client(config: &Config, base_url: Option<String>) -> LmStudioClient {
    let mut client = LmStudioClient::new()
        .with_base_url(base_url.unwrap_or_else(|| config.client.base_url.clone()));
    if let Some(key) = &config.client.api_key {
        client = client.with_api_key(key);
    }
    client
}

async fn run_benchmark(
    config: &Config,
    model: String,
    base_url: Option<String>,
    prompt_path: PathBuf,
    gold_path: Option<PathBuf>,
    iterations_arg: Option<usize>,
    output_dir: Option<PathBuf>,
    save_responses: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d-%H%M%S").to_string();
    let iterations = iterations_arg.unwrap_or(config.benchmark.iterations).max(1);

    println!("=== Answer Benchmark ===");
    println!("Run ID: {}", run_id);
    println!("Model:  {}", model);
    println!();

    let gold = load_gold(&gold_path)?;
    let evaluator = Evaluator::new(
        gold,
        ScorePolicy {
            mismatch_divisor: config.scoring.mismatch_divisor,
        },
    );

    let prompt_content = std::fs::read_to_string(&prompt_path).map_err(|e| {
        format!(
            "failed to read prompt file {}: {}",
            prompt_path.display(),
            e
        )
    })?;
    println!("Prompt size: {} characters", prompt_content.len());
    println!("Questions:   {}", evaluator.expected());
    println!("Iterations:  {}", iterations);

    let client = build_client(config, base_url).with_model(&model);
    let executor = Executor::new(
        Arc::new(client),
        ExecutorConfig {
            retry_count: config.benchmark.retry_count,
            retry_delay_ms: config.benchmark.retry_delay_ms,
            max_retry_delay_ms: config.benchmark.max_retry_delay_ms,
            timeout_ms: config.client.timeout_ms,
        },
    );

    let run_dir = output_dir
        .unwrap_or_else(|| PathBuf::from(&config.benchmark.output_dir))
        .join(&run_id);
    std::fs::create_dir_all(&run_dir)?;

    let save_responses = save_responses || config.benchmark.save_responses;

    let request = CompletionRequest::new(
        vec![Message::user(&prompt_content)],
        config.benchmark.max_tokens,
    )
    .with_model(&model)
    .with_temperature(config.benchmark.temperature);

    let mut results = Vec::new();
    for iteration in 1..=iterations {
        println!("\nRunning iteration {}/{}...", iteration, iterations);

        let response = executor.complete(&request).await?;
        tracing::debug!(
            "Received {} characters in {}ms",
            response.content.len(),
            response.latency_ms
        );

        if save_responses {
            let responses_dir = run_dir.join("responses");
            std::fs::create_dir_all(&responses_dir)?;
            std::fs::write(
                responses_dir.join(format!("iter-{}.txt", iteration)),
                &response.content,
            )?;
        }

        let extraction = extract_labeled(&response.content, evaluator.expected());
        warn_if_short(&extraction, evaluator.expected());

        let result = evaluator.evaluate(&extraction.candidates);
        print_iteration_report(iteration, &result);
        results.push(result);
    }

    let report = BenchmarkReport::aggregate(results);
    print_benchmark_report(&model, &report);

    let summary = JsonSummary::from_report(&run_id, &model, &report);
    let summary_path = run_dir.join("summary.json");
    summary.write_to_file(&summary_path)?;
    println!("Summary written to {}", summary_path.display());

    Ok(())
}

fn score_input(
    config: &Config,
    input: Option<PathBuf>,
    gold_path: Option<PathBuf>,
    labeled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (name, raw) = match input {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            (path.display().to_string(), content)
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            ("stdin".to_string(), buf)
        }
    };

    let gold = load_gold(&gold_path)?;
    let evaluator = Evaluator::new(
        gold,
        ScorePolicy {
            mismatch_divisor: config.scoring.mismatch_divisor,
        },
    );

    let extraction = if labeled {
        extract_labeled(&raw, evaluator.expected())
    } else {
        extract_positional(&raw, evaluator.expected())
    };
    warn_if_short(&extraction, evaluator.expected());

    let result = evaluator.evaluate(&extraction.candidates);
    print_scored_lines(&format!("--- Scoring {} ---", name), &result);

    println!();
    println!("{} scored: {:.2}", name, result.average);

    Ok(())
}

fn warn_if_short(extraction: &Extraction, expected: usize) {
    if extraction.matched < expected {
        tracing::warn!(
            "Only found {} answers, expected {}",
            extraction.matched,
            expected
        );
    }
}

async fn list_models(
    config: &Config,
    base_url: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, base_url);
    let models = client.list_models().await?;

    if models.is_empty() {
        println!("No models available.");
        return Ok(());
    }

    println!("Available models ({} total):", models.len());
    println!("{:=<60}", "");

    for (i, model) in models.iter().enumerate() {
        println!("{:2}. {}", i + 1, model.id);
        if model.owned_by != "unknown" {
            println!("    Owner: {}", model.owned_by);
        }
        println!();
    }

    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Config::default().save_toml(&output)?;
    println!("Sample configuration written to {}", output.display());

    Ok(())
}
