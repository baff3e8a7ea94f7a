//! SQLite-backed document store.
//!
//! Documents are JSON text in the `documents` table, keyed by path. Diesel is
//! synchronous, so each call runs on the blocking pool while holding the single
//! connection; writes use `REPLACE INTO`, which gives overwrite semantics.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::{
    db::{connection::connect_sqlite, migrate},
    schema::documents,
    store::{DocumentStore, StoreError},
};

#[derive(Insertable, Debug)]
#[diesel(table_name = documents)]
struct DocumentRow<'a> {
    path: &'a str,
    body: &'a str,
    updated_at: &'a str, // RFC3339 UTC
}

/// Document store persisted in a SQLite database file.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `database_url` and applies migrations.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        migrate::run_sqlite(database_url)?;
        let conn = connect_sqlite(database_url)?;
        tracing::debug!(database_url, "sqlite document store opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Task("sqlite connection lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let owned = path.to_string();
        let body: Option<String> = self
            .with_conn(move |conn| {
                let body = documents::table
                    .find(owned.as_str())
                    .select(documents::body)
                    .first::<String>(conn)
                    .optional()?;
                Ok(body)
            })
            .await?;

        body.map(|b| serde_json::from_str::<Value>(&b))
            .transpose()
            .map_err(|source| StoreError::Decode {
                path: path.to_string(),
                source,
            })
    }

    async fn set(&self, path: &str, document: Value) -> Result<(), StoreError> {
        let path = path.to_string();
        let body = serde_json::to_string(&document).map_err(StoreError::Encode)?;
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        self.with_conn(move |conn| {
            diesel::replace_into(documents::table)
                .values(&DocumentRow {
                    path: &path,
                    body: &body,
                    updated_at: &updated_at,
                })
                .execute(conn)?;
            Ok(())
        })
        .await
    }
}
