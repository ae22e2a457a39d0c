use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    Set, TransactionTrait,
};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::config::connect;
use model::entities::{character, planet, user};

/// Contents of a seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub characters: Vec<SeedCharacter>,
    #[serde(default)]
    pub planets: Vec<SeedPlanet>,
}

#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedCharacter {
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub height: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedPlanet {
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub population: String,
    #[serde(default)]
    pub terrain: String,
}

/// Number of rows inserted per table
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub characters: usize,
    pub planets: usize,
}

fn primary_key(id: Option<i32>) -> ActiveValue<i32> {
    match id {
        Some(id) => Set(id),
        None => ActiveValue::NotSet,
    }
}

pub async fn seed(json_path: &Path, database_url: &str) -> Result<()> {
    info!("Starting catalogue seed");
    debug!("JSON file: {}", json_path.display());

    let file = File::open(json_path)
        .with_context(|| format!("Failed to open JSON file: {}", json_path.display()))?;
    let data: SeedData = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse seed file: {}", json_path.display()))?;

    let db = connect(database_url).await?;
    let summary = seed_database(&db, data).await?;

    info!(
        "Seed completed: {} users, {} characters, {} planets",
        summary.users, summary.characters, summary.planets
    );
    Ok(())
}

/// Insert every row of `data` in one transaction.
///
/// Either the whole file lands or nothing does.
pub async fn seed_database(db: &DatabaseConnection, data: SeedData) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    info!("Importing users...");
    for row in data.users {
        trace!("Inserting user {}", row.email);
        user::ActiveModel {
            id: primary_key(row.id),
            name: Set(row.name),
            email: Set(row.email),
            password: Set(row.password),
        }
        .insert(&txn)
        .await
        .context("Failed to insert user")?;
        summary.users += 1;
    }

    info!("Importing characters...");
    for row in data.characters {
        trace!("Inserting character {}", row.name);
        character::ActiveModel {
            id: primary_key(row.id),
            name: Set(row.name),
            gender: Set(row.gender),
            mass: Set(row.mass),
            height: Set(row.height),
        }
        .insert(&txn)
        .await
        .context("Failed to insert character")?;
        summary.characters += 1;
    }

    info!("Importing planets...");
    for row in data.planets {
        trace!("Inserting planet {}", row.name);
        planet::ActiveModel {
            id: primary_key(row.id),
            name: Set(row.name),
            population: Set(row.population),
            terrain: Set(row.terrain),
        }
        .insert(&txn)
        .await
        .context("Failed to insert planet")?;
        summary.planets += 1;
    }

    // Explicit ids bypass PostgreSQL sequences
    if txn.get_database_backend() == DatabaseBackend::Postgres {
        for table in ["users", "characters", "planets"] {
            debug!("Resetting id sequence of {}", table);
            txn.execute_unprepared(&format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), \
                 COALESCE((SELECT MAX(id) FROM {table}), 0) + 1, false)"
            ))
            .await?;
        }
    }

    txn.commit().await?;
    Ok(summary)
}
