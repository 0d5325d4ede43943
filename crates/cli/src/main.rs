//! wfo-search CLI - entity search for the orchestrator backend
//!
//! This binary provides the command-line interface for the wfo-search system.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wfo_search::render::{render_agent_state, render_results};
use wfo_search_client::create_search_backend;
use wfo_search_core::config::Config;
use wfo_search_core::{translate, EntityKind, QueryInput, SearchAgentState};
use wfo_search_orchestrator::{execute, run_search, SearchOutcome};

#[derive(Parser)]
#[command(name = "wfo-search")]
#[command(about = "Search subscriptions, products, workflows and processes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the backend parameters a query translates to
    Translate {
        /// Entity kind to search (defaults to search.default_entity_kind)
        #[arg(short, long)]
        kind: Option<EntityKind>,
        /// Search bar input, e.g. `Formatics status:active`
        query: Vec<String>,
    },
    /// Run a single search against the backend
    Search {
        /// Entity kind to search (defaults to search.default_entity_kind)
        #[arg(short, long)]
        kind: Option<EntityKind>,
        /// Show the record behind each result
        #[arg(long)]
        detail: bool,
        /// Search bar input, e.g. `Formatics status:active`
        query: Vec<String>,
    },
    /// Inspect a saved search agent state
    AgentState {
        /// JSON file holding the agent state
        file: PathBuf,
        /// Run the agent's parameters against the backend
        #[arg(long)]
        run: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Commands::Translate { kind, query }) => {
            translate_query(cli.config.as_deref(), kind, &query)
        }
        Some(Commands::Search {
            kind,
            detail,
            query,
        }) => search(cli.config.as_deref(), kind, &query, detail).await,
        Some(Commands::AgentState { file, run }) => {
            show_agent_state(cli.config.as_deref(), &file, run).await
        }
        Some(Commands::Config) => show_config(cli.config.as_deref()),
        None => {
            println!("Run 'wfo-search search <query>' to search, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
///
/// Logs go to stderr so command output can be piped.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "wfo_search={level},wfo_search_core={level},wfo_search_client={level},wfo_search_orchestrator={level}"
        ))
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let (config, sources) = Config::load_layered(config_path)?;
    for source in &sources {
        debug!("Loaded configuration from {}", source.display());
    }
    config.validate()?;
    Ok(config)
}

fn resolve_query(
    kind: Option<EntityKind>,
    query: &[String],
    config: &Config,
) -> (EntityKind, QueryInput) {
    let kind = kind.unwrap_or(config.search.default_entity_kind);
    (kind, QueryInput::parse(&query.join(" ")))
}

fn translate_query(
    config_path: Option<&Path>,
    kind: Option<EntityKind>,
    query: &[String],
) -> Result<()> {
    let config = load_config(config_path)?;
    let (kind, input) = resolve_query(kind, query, &config);

    let parameters = translate(&input, kind);
    println!(
        "{}",
        serde_json::to_string_pretty(&parameters).context("Failed to serialize parameters")?
    );
    if !parameters.is_active() {
        eprintln!("(inactive: no request would be sent)");
    }
    Ok(())
}

async fn search(
    config_path: Option<&Path>,
    kind: Option<EntityKind>,
    query: &[String],
    detail: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let (kind, input) = resolve_query(kind, query, &config);
    let backend = create_search_backend(&config.backend)?;

    info!("Searching {} via {}", kind.label(), config.backend.base_url);
    let outcome = run_search(backend.as_ref(), kind, &input).await;
    print_outcome(outcome, detail)
}

fn print_outcome(outcome: SearchOutcome, detail: bool) -> Result<()> {
    match outcome {
        SearchOutcome::Inactive => {
            println!("Nothing to search: enter more than one character or a field:value filter.");
            Ok(())
        }
        SearchOutcome::Completed(results) => {
            println!("{}", render_results(&results, detail));
            Ok(())
        }
        SearchOutcome::Failed(message) => bail!("Search failed: {message}"),
    }
}

async fn show_agent_state(config_path: Option<&Path>, file: &Path, run: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read agent state from {}", file.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&content).context("Agent state is not valid JSON")?;

    let config = load_config(config_path)?;
    let state = SearchAgentState::from_value(&value);
    println!("{}", render_agent_state(&config.agent.name, &state));

    if !run {
        return Ok(());
    }

    let Some(parameters) = state
        .parameters
        .as_ref()
        .and_then(|p| p.to_search_parameters())
    else {
        bail!("Agent state has no entity type yet; nothing to run");
    };

    let backend = create_search_backend(&config.backend)?;
    println!();
    print_outcome(execute(backend.as_ref(), &parameters).await, false)
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
