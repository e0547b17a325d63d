#![forbid(unsafe_code)]

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::utils::db_statements::{INSERT_GREETING, LIST_GREETINGS, UPSERT_GREETING};
use crate::utils::db_types::Greeting;
use crate::utils::store::GreetingStore;

// ***************************************************************************
//                                SQLite Store
// ***************************************************************************
#[derive(Debug, Clone)]
pub struct SqliteGreetingStore {
    db: Pool<Sqlite>,
}

impl SqliteGreetingStore {
    /// The pool must already have the greeting migrations applied.
    pub fn new(db: Pool<Sqlite>) -> Self {
        SqliteGreetingStore { db }
    }
}

#[async_trait]
impl GreetingStore for SqliteGreetingStore {
    async fn save(&self, greeting: Greeting) -> Result<Greeting> {
        // Get a connection to the db and start a transaction.  Uncommited transactions
        // are automatically rolled back when they go out of scope.
        let mut tx = self.db.begin().await?;

        let saved = match greeting.id() {
            None => {
                let row = sqlx::query(INSERT_GREETING)
                    .bind(greeting.content())
                    .bind(greeting.created())
                    .fetch_one(&mut *tx)
                    .await?;
                let id: i64 = row.get(0);
                greeting.with_id(id)
            },
            Some(id) => {
                sqlx::query(UPSERT_GREETING)
                    .bind(id)
                    .bind(greeting.content())
                    .bind(greeting.created())
                    .execute(&mut *tx)
                    .await?;
                greeting
            },
        };

        // Commit the transaction.
        tx.commit().await?;
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Greeting>> {
        let rows = sqlx::query(LIST_GREETINGS)
            .fetch_all(&self.db)
            .await?;

        // Collect the row data into greeting objects.
        let mut greetings: Vec<Greeting> = vec!();
        for row in rows {
            greetings.push(Greeting::from_parts(row.get(0), row.get(1), row.get(2)));
        }

        Ok(greetings)
    }
}
