//! Command line interface for operating the showcase server. Supports
//! initialization, seeding the sample catalog, ingesting event files,
//! registering identities, and serving the HTTP API.

mod config;
mod event;
mod gate;
mod identity;
mod seed;
mod server;
mod session;
mod storage;
mod tier;

use std::{
    fs,
    net::SocketAddr,
    path::Path,
    sync::Arc,
};

use clap::{Parser, Subcommand};

use config::Settings;
use identity::{FileProvider, Identity};
use storage::Store;
use tier::Tier;

/// Command line interface entry point.
#[derive(Parser)]
#[command(
    name = "marquee",
    author,
    version,
    about = "Tier-gated event showcase server"
)]
struct Cli {
    /// Path to the `.env` configuration file.
    #[arg(long, default_value = ".env")]
    env: String,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Create the database, identity directory, and a default `.env`.
    Init,
    /// Insert the bundled sample catalog (two events per tier).
    Seed,
    /// Insert events from one or more JSON files.
    Ingest {
        /// Paths to JSON event files to insert.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Create a local identity record.
    Register {
        /// Opaque identity token.
        token: String,
        /// Display name or contact.
        name: String,
        /// Initial tier.
        #[arg(long, default_value = "free")]
        tier: Tier,
    },
    /// Serve the HTTP API.
    Serve,
}

/// Execute the selected CLI subcommand.
async fn run(cli: Cli) -> anyhow::Result<()> {
    ensure_env_file(&cli.env)?;
    let cfg = Settings::from_env(&cli.env)?;
    let store = Store::connect(&cfg.database_url).await?;
    let provider = FileProvider::new(cfg.identity_root.clone());
    match cli.command {
        Commands::Init => {
            store.init().await?;
            provider.init()?;
        }
        Commands::Seed => {
            store.init().await?;
            for ev in seed::sample_events()? {
                let inserted = store.insert(ev).await?;
                tracing::info!("seeded event '{}'", inserted.title);
            }
        }
        Commands::Ingest { files } => {
            store.init().await?;
            // Load each JSON file and insert it as a new event.
            for f in files {
                let data = fs::read_to_string(&f)?;
                let ev: event::NewEvent = serde_json::from_str(&data)?;
                store.insert(ev).await?;
            }
        }
        Commands::Register { token, name, tier } => {
            provider.init()?;
            provider.put(&Identity {
                token,
                name,
                metadata: serde_json::json!({ "tier": tier.as_str() }),
            })?;
        }
        Commands::Serve => {
            store.init().await?;
            provider.init()?;
            let addr: SocketAddr = cfg.bind_http.parse()?;
            tracing::info!("listening on {addr}");
            server::serve_http(addr, store, Arc::new(provider), std::future::pending()).await?;
        }
    }
    Ok(())
}

/// Create a default `.env` file if one is not already present at `path`.
fn ensure_env_file(path: &str) -> anyhow::Result<()> {
    let env_path = Path::new(path);
    if env_path.exists() {
        return Ok(());
    }
    if let Some(parent) = env_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let base_dir = match env_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    let mut content = String::new();
    content.push_str(&format!(
        "DATABASE_URL=sqlite://{}\n",
        display_path(&base_dir.join("marquee.db"))
    ));
    content.push_str("BIND_HTTP=127.0.0.1:7780\n");
    content.push_str(&format!(
        "IDENTITY_ROOT={}\n",
        display_path(&base_dir.join("identities"))
    ));
    fs::write(env_path, content)?;
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();
    run(cli).await
}
