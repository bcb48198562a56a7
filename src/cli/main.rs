use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use todo_search::config::Config;
use todo_search::search::{RawParams, SearchService};
use todo_search::state::{load_fixtures, InMemoryStore, TodoStore};

#[derive(Parser)]
#[command(name = "todo-search-cli")]
#[command(about = "Run todo searches against a fixture file", long_about = None)]
struct Cli {
    /// JSON fixture file with `todos`, `categories` and `tags`
    #[arg(short, long, env = "TODO_SEARCH_FIXTURES")]
    fixtures: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one owner's todos
    Search {
        #[arg(short, long)]
        owner: i64,

        /// Search parameter as key=value; repeat a key to pass several values
        #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Read parameters from a JSON object instead
        #[arg(long, conflicts_with = "params")]
        json: Option<String>,

        /// Print compact JSON
        #[arg(short, long)]
        compact: bool,
    },

    /// Summarize the fixture file per owner
    Stats {
        #[arg(short, long)]
        owner: i64,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))?;

    if key.trim().is_empty() {
        return Err(format!("empty key in `{}`", raw));
    }

    Ok((key.trim().to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_search=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    let store = Arc::new(InMemoryStore::new());
    let loaded = load_fixtures(store.as_ref(), &cli.fixtures)
        .await
        .with_context(|| format!("failed to load fixtures from {}", cli.fixtures.display()))?;
    tracing::info!(todos = loaded, "Fixtures loaded");

    match cli.command {
        Commands::Search {
            owner,
            params,
            json,
            compact,
        } => {
            let params = match json {
                Some(raw) => {
                    let value: serde_json::Value =
                        serde_json::from_str(&raw).context("--json is not valid JSON")?;
                    match value {
                        serde_json::Value::Object(map) => RawParams::from_json(map),
                        _ => bail!("--json must be a JSON object"),
                    }
                }
                None => RawParams::from_pairs(params),
            };

            let service = SearchService::new(store, config.search);
            let result = service.search(owner, &params).await?;

            let output = if compact {
                serde_json::to_string(&result)?
            } else {
                serde_json::to_string_pretty(&result)?
            };
            println!("{}", output);
        }

        Commands::Stats { owner } => {
            let todos = store.todos_for_owner(owner).await?;
            let categories = store.categories_for_owner(owner).await?;
            let tags = store.tags_for_owner(owner).await?;
            let completed = todos.iter().filter(|t| t.is_completed()).count();

            println!("Owner {}", owner);
            println!("  Todos: {} ({} completed)", todos.len(), completed);
            println!("  Categories: {}", categories.len());
            println!("  Tags: {}", tags.len());
        }
    }

    Ok(())
}
