use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitlog::{api, config::Config, db, entries, mcp};

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Personal fitness log: daily entries, workouts and running stats")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port for HTTP API (overrides FITLOG_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides FITLOG_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Start MCP server via stdio
    Mcp {
        /// SQLite database file (overrides FITLOG_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Record entries from a compact YAML file
    Import {
        /// YAML file holding one entry or a list of entries
        file: PathBuf,

        /// SQLite database file (overrides FITLOG_DB_PATH)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "fitlog=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let db = open_database(config.db_path.clone())?;
    let state = api::AppState::new(db)?;
    tracing::info!("Loaded {} exercises", state.catalog.len());

    let app = api::create_router_with_config(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("fitlog server listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // MCP mode needs stderr for logging since stdout is the protocol channel
    let use_stderr = matches!(cli.command, Some(Commands::Mcp { .. }));
    init_tracing(use_stderr);

    let mut config = Config::from_env();

    match cli.command {
        Some(Commands::Serve { port, db }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if db.is_some() {
                config.db_path = db;
            }
            serve(config).await?;
        }
        Some(Commands::Mcp { db }) => {
            let db = open_database(db.or(config.db_path))?;
            mcp::run_stdio_server(db).await?;
        }
        Some(Commands::Import { file, db }) => {
            let db = open_database(db.or(config.db_path))?;
            let catalog = db.load_catalog()?;

            let text = std::fs::read_to_string(&file)?;
            let summary = entries::import_yaml(&db, &catalog, &text, entries::today())?;

            println!(
                "Imported {} entries, skipped {}",
                summary.imported, summary.skipped
            );
        }
        None => serve(config).await?,
    }

    Ok(())
}
