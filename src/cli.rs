use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

use crate::config::{DatabaseConfig, ServerConfig};
use commands::{init_database, migrate_and_serve, seed, serve};

#[derive(Parser)]
#[command(name = "holonet")]
#[command(about = "Star Wars catalogue favourites API with database tooling")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        #[command(flatten)]
        config: ServerConfig,
    },
    /// Initialize the database using migrations
    InitDb {
        #[command(flatten)]
        database: DatabaseConfig,
    },
    /// Apply migrations, then start the web server
    MigrateAndServe {
        #[command(flatten)]
        config: ServerConfig,
    },
    /// Load users, characters and planets from a JSON file
    ///
    /// The file holds `users`, `characters` and `planets` arrays. Rows may
    /// carry an explicit `id`; otherwise the store assigns one.
    Seed {
        /// Path to the JSON seed file
        #[arg(short, long)]
        json_path: PathBuf,

        #[command(flatten)]
        database: DatabaseConfig,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve { config } => {
                serve(&config).await?;
            }
            Commands::InitDb { database } => {
                init_database(&database.database_url).await?;
            }
            Commands::MigrateAndServe { config } => {
                migrate_and_serve(&config).await?;
            }
            Commands::Seed { json_path, database } => {
                seed(&json_path, &database.database_url).await?;
            }
        }
        Ok(())
    }
}
