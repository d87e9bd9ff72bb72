use std::path::PathBuf;

use anyhow::Context;
use bookshelf_db::GenreSet;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Books catalog service")]
struct Cli {
    /// Directory holding base.toml and per-environment overlays
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to apply (local, staging, production);
    /// defaults to BOOKSHELF_ENV, then local
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the accepted genres, one per line
    Genres,
    /// Load the configuration and print a summary
    CheckConfig,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        Settings::load_with(self.config_dir.as_deref(), self.env.as_deref())
            .with_context(|| "failed to load bookshelf settings")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookshelf CLI serving");
            bookshelf_app::serve(settings).await
        }
        Command::Genres => {
            for genre in GenreSet::from_settings(&settings.catalog).as_slice() {
                println!("{genre}");
            }
            Ok(())
        }
        Command::CheckConfig => {
            println!("environment: {:?}", settings.environment);
            println!("listen: {}", settings.server.bind_address());
            println!("database: {}", settings.database.endpoint);
            println!("api tokens: {}", settings.auth.tokens.len());
            println!(
                "genres: {}",
                GenreSet::from_settings(&settings.catalog).len()
            );
            Ok(())
        }
    }
}
