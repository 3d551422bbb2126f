use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use slate::auth::KeyGenerator;
use slate::config::ServerConfig;
use slate::server::{AppState, SlidingWindow, create_router};
use slate::store::{SqliteStore, Store};
use slate::types::ApiKey;
use slate::uid::generate_uid;

fn create_admin_key(generator: &KeyGenerator) -> anyhow::Result<(ApiKey, String)> {
    let (raw_key, lookup, hash) = generator.generate()?;
    let key = ApiKey {
        uid: generate_uid("KEY"),
        key_hash: hash,
        key_lookup: lookup,
        description: Some("initial admin key".to_string()),
        role: "admin".to_string(),
        is_admin: true,
        expires_at: None,
        created_at: Utc::now(),
        last_used_at: None,
    };
    Ok((key, raw_key))
}

#[cfg(unix)]
fn set_restrictive_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        tracing::warn!("Failed to set permissions on {}: {e}", path.display());
    }
}

#[derive(Parser)]
#[command(name = "slate")]
#[command(about = "A production tracking server for VFX pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Optional TOML config file; command line flags take precedence
        #[arg(long)]
        config: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create database and admin key)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },
}

fn run_init(data_dir: String) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("slate.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    let key_file = data_path.join(".admin_key");

    if store.has_admin_key()? {
        bail!(
            "Server already initialized. Admin key exists at: {}",
            key_file.display()
        );
    }

    let generator = KeyGenerator::new();
    let (key, raw_key) = create_admin_key(&generator)?;

    store.create_api_key(&key)?;
    fs::write(&key_file, &raw_key)?;

    #[cfg(unix)]
    set_restrictive_permissions(&key_file);

    println!();
    println!("========================================");
    println!("Admin API key (save this, it won't be shown again):");
    println!();
    println!("  {raw_key}");
    println!();
    println!("Key also written to: {}", key_file.display());
    println!("========================================");
    println!();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("slate=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => {
                run_init(data_dir)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            config,
        } => {
            let mut config = match config {
                Some(path) => ServerConfig::from_file(path)?,
                None => ServerConfig::default(),
            };
            config.host = host;
            config.port = port;
            config.data_dir = data_dir.into();

            let key_file = config.data_dir.join(".admin_key");
            if !key_file.exists() {
                bail!(
                    "Server not initialized. Run 'slate admin init' first to create the database and admin key."
                );
            }

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;
            if !store.has_admin_key()? {
                bail!(
                    "Server not initialized. Run 'slate admin init' first to create the database and admin key."
                );
            }

            info!("Admin key available at {}", key_file.display());

            let limiter = SlidingWindow::new(
                config.rate_limit_requests,
                Duration::from_secs(config.rate_limit_window_secs),
            );
            let state = Arc::new(AppState::new(Arc::new(store), Arc::new(limiter)));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
