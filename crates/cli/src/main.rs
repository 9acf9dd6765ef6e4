use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use shelf_app::books::{duplicate_ids, models::Book};
use shelf_kernel::settings::Settings;
use shelf_store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "Book catalogue backed by a flat JSON file")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
        /// Override `storage.data_file`
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
    /// Load the data file and report its record count and duplicate ids
    Check {
        /// Override `storage.data_file`
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load Shelf settings")?;

    match cli.command {
        Command::Serve {
            host,
            port,
            data_file,
        } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(data_file) = data_file {
                settings.storage.data_file = data_file;
            }

            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "shelf serve starting");
            shelf_app::bootstrap::run(settings).await
        }
        Command::Check { data_file } => {
            let path = data_file.unwrap_or(settings.storage.data_file);
            check(path).await
        }
    }
}

async fn check(path: PathBuf) -> anyhow::Result<()> {
    let store: JsonFileStore<Book> = JsonFileStore::new(&path);
    let books = store
        .load()
        .await
        .with_context(|| format!("cannot load {}", path.display()))?;

    println!("{} books in {}", books.len(), path.display());

    let duplicates = duplicate_ids(&books);
    if !duplicates.is_empty() {
        bail!("duplicate book ids: {}", duplicates.join(", "));
    }
    Ok(())
}
