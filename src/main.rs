use anyhow::Result;
use clap::Parser;
use faqbot::cli::{Cli, Commands};
use faqbot::storage::FaqStore;
use faqbot::{serve, utils, AppState, Settings, SqliteStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::new()?,
    };
    if let Some(database) = cli.database {
        settings.database.path = database;
    }

    init_tracing(&settings.logging.level);

    let result = match cli.command {
        Commands::Serve { host, port } => handle_serve(settings, host, port).await,
        Commands::Train { question, answer } => handle_train(&settings, &question, &answer).await,
        Commands::Stats => handle_stats(&settings).await,
    };

    if let Err(e) = &result {
        utils::print_error(&format!("Error: {:#}", e));
    }

    result
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=debug", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn handle_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let api_key = Settings::api_key()?;
    let state = AppState::from_settings(&settings, api_key)?;
    tracing::info!(path = %settings.database.path, "Database initialized");

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;

    utils::print_header("FAQ Chatbot API");
    utils::print_field("listening", format!("http://{}", addr));
    utils::print_field("model", state.generator.model_name());
    utils::print_field("database", &settings.database.path);
    match settings.memory.max_turns {
        Some(cap) => utils::print_field("memory cap", format!("{} turns per session", cap)),
        None => utils::print_field("memory cap", "unbounded"),
    }

    serve(Arc::new(state), addr).await
}

async fn handle_train(settings: &Settings, question: &str, answer: &str) -> Result<()> {
    if question.trim().is_empty() || answer.trim().is_empty() {
        anyhow::bail!("Both question and answer are required");
    }

    let store = SqliteStore::open(&settings.database.path)?;
    let pair = store.add_training(question, answer).await?;

    utils::print_success(&format!("Training pair {} added", pair.id));
    Ok(())
}

async fn handle_stats(settings: &Settings) -> Result<()> {
    let store = SqliteStore::open(&settings.database.path)?;

    utils::print_header("FAQ Chatbot Database");
    utils::print_field("database", &settings.database.path);
    let log_count = store.count_logs().await?;
    let training_count = store.count_training().await?;

    utils::print_field("conversations", log_count);
    utils::print_field("training pairs", training_count);

    if training_count == 0 {
        utils::print_info(
            "No training data yet. Add some with `faqbot train <question> <answer>`.",
        );
    }
    Ok(())
}
