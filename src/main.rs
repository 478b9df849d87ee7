//! Parley server entry point.

use clap::{Parser, Subcommand};
use parley::{ChatEngine, ChatRequest, Config, RestApiConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parley: conversational query engine for interview research data
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default behavior)
    Serve {
        /// HTTP port. If not specified, uses the config file value.
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable JSON logging format
        #[arg(long)]
        json_logs: bool,
    },
    /// Ask a single question from the command line
    Ask {
        /// The natural language question
        question: String,
        /// Comma-separated tables to focus generation on
        #[arg(short, long)]
        tables: Option<String>,
        /// Output the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the table catalog
    Tables,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let is_serve = matches!(args.command, Some(Command::Serve { .. }) | None);

    if !is_serve {
        // Minimal logging for CLI commands
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    match args.command {
        Some(Command::Serve { port, json_logs }) => run_server(config, port, json_logs).await,
        Some(Command::Ask {
            question,
            tables,
            json,
        }) => run_ask(config, question, tables, json).await,
        Some(Command::Tables) => run_tables(config),
        None => run_server(config, None, false).await,
    }
}

/// Run the HTTP server.
async fn run_server(mut config: Config, port: Option<u16>, json_logs: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Parley server v{}", env!("CARGO_PKG_VERSION"));

    if let Some(p) = port {
        config.server.port = p;
    }

    let engine = Arc::new(ChatEngine::from_config(&config)?);

    tracing::info!(
        database = %config.database.path,
        ai_configured = engine.ai_configured(),
        "Configuration loaded"
    );

    let rest_config = RestApiConfig {
        enable_cors: config.server.enable_cors,
    };
    let router = parley::create_rest_router(engine, &rest_config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

/// Answer one question and print the result.
async fn run_ask(
    config: Config,
    question: String,
    tables: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let engine = ChatEngine::from_config(&config)?;

    let selected_tables =
        tables.map(|t| t.split(',').map(|s| s.trim().to_string()).collect::<Vec<_>>());

    let response = engine
        .ask(ChatRequest {
            message: question,
            selected_tables,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.response);
        if let Some(sql) = &response.sql_query {
            println!("\nSQL: {}", sql);
        }
    }
    Ok(())
}

/// Print the table catalog.
fn run_tables(_config: Config) -> anyhow::Result<()> {
    let catalog = parley::TableCatalog::new();
    for table in catalog.all() {
        println!("{}\n", table.render());
    }
    Ok(())
}
