use clap::Parser;
use ragstore::cli::commands::{Cli, Commands};
use ragstore::config::Settings;
use ragstore::domain::entities::document::Metadata;
use ragstore::RagStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    let store = match RagStore::new(&settings).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error initializing store: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(store, &settings, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(
    store: RagStore,
    settings: &Settings,
    cmd: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Ingest {
            content,
            id,
            metadata,
        } => {
            let metadata: Metadata = match metadata {
                Some(json) => serde_json::from_str(&json)?,
                None => Metadata::new(),
            };
            let document = store.ingest(id, content, metadata).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Commands::Retrieve { query, limit } => {
            let results = store
                .retrieve(&query, limit.unwrap_or(settings.top_k))
                .await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Delete { id } => {
            let removed = store.delete(&id).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "id": id, "removed": removed }))?
            );
        }
        Commands::Answer { question, limit } => {
            let answer = store
                .answer(&question, limit.unwrap_or(settings.top_k))
                .await?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Commands::Rebuild => {
            let count = store.rebuild().await?;
            println!("Rebuilt index from {count} documents");
        }
        Commands::Stats => {
            let stats = store.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
