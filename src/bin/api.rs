//! Todo API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use todo_api::api::{self, ApiError, Config};
use todo_api::db::{Database, DbError, SqliteDatabase};
use todo_api::paths::get_db_path;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(todo_api::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(todo_api::binary::io))]
    Io(#[from] std::io::Error),

    #[error("API server error: {0}")]
    #[diagnostic(code(todo_api::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser, Debug)]
#[command(name = "todo-api")]
#[command(author, version, about = "Todo REST API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, env = "TODO_API_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Database file path (defaults to XDG data directory: ~/.local/share/todo-api/todos.db)
    #[arg(long, env = "TODO_API_DB")]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Serve interactive API docs at /docs
    #[arg(long)]
    docs: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            host: self.host,
            port: self.port,
            enable_docs: self.docs,
        }
    }

    fn db_path(&self) -> PathBuf {
        self.db.clone().unwrap_or_else(get_db_path)
    }
}

async fn run(cli: Cli) -> Result<(), BinaryError> {
    api::init_tracing(cli.verbose);

    let db_path = cli.db_path();

    println!("Opening database at {:?}", db_path);

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&db_path).await?;

    // Run migrations before starting the server
    db.migrate().await?;
    println!("Database migrations complete");

    println!();
    println!("todo-api starting...");
    println!("   API:      http://{}:{}/todos", cli.host, cli.port);
    if cli.docs {
        println!("   Docs:     http://{}:{}/docs", cli.host, cli.port);
    }
    println!("   Database: {}", db_path.display());
    println!();

    // Pass the abstract Database to the API layer
    api::run(cli.config(), db).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}
