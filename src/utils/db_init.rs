#![forbid(unsafe_code)]

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, Pool};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;

use log::{info, error};
use crate::utils::errors::Errors;

// Database constants.
const POOL_MIN_CONNECTIONS: u32 = 2;
const POOL_MAX_CONNECTIONS: u32 = 8;

// ---------------------------------------------------------------------------
// init_db:
// ---------------------------------------------------------------------------
// See migrations directory for database schema defintion.
pub async fn init_db(url: &str) -> Result<Pool<Sqlite>> {

    // Should look like this: "sqlite:///home/bud/.greeting/database/greeting.db"
    if !Sqlite::database_exists(url).await.unwrap_or(false) {
        info!("Creating database {}", url);
        if let Err(e) = Sqlite::create_database(url).await {
            let msg = Errors::StoreError(format!("database {} create error: {}", url, e));
            error!("{}", msg);
            return Err(msg.into());
        }
        info!("Create db success");
    } else {
        info!("Database already exists");
    }

    // The synchronous setting 3 means EXTRA, the strongest durability setting.
    // The automatic index setting avoids temporary index creation on a connection
    // when sqlite thinks one would be useful.
    let options = SqliteConnectOptions::from_str(url)?
        .journal_mode(SqliteJournalMode::Wal)
        .pragma("automatic_index", "0")
        .pragma("synchronous", "3")
        .foreign_keys(true);

    // Create the database connection pool.
    let db = SqlitePoolOptions::new()
        .min_connections(POOL_MIN_CONNECTIONS)
        .max_connections(POOL_MAX_CONNECTIONS)
        .connect_with(options).await?;

    run_migrations(&db).await?;
    Ok(db)
}

// ---------------------------------------------------------------------------
// run_migrations:
// ---------------------------------------------------------------------------
/** Apply the migrations compiled in from the migrations directory. */
pub async fn run_migrations(db: &Pool<Sqlite>) -> Result<()> {
    match sqlx::migrate!("./migrations").run(db).await {
        Ok(_) => {
            info!("Migration success");
            Ok(())
        },
        Err(e) => {
            let msg = Errors::StoreError(format!("migration run error: {}", e));
            error!("{}", msg);
            Err(msg.into())
        }
    }
}
