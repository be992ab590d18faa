use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use sqlx::PgPool;
use tokio::sync::{Mutex, OnceCell};
use tracing::error;

use crate::domain::entities::CheckinRecord;
use crate::domain::errors::CheckinError;
use crate::domain::ports::CheckinStore;

const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

fn storage_error(backend: &'static str, err: impl Display) -> CheckinError {
    error!(backend, error = %err, "check-in store call failed");
    CheckinError::Storage(err.to_string())
}

// PostgreSQL-backed check-in store: one row per (event_key, id).
#[derive(Clone)]
pub struct PostgresCheckinStore {
    pub db: PgPool,
}

#[async_trait]
impl CheckinStore for PostgresCheckinStore {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError> {
        sqlx::query(
            r#"
            INSERT INTO checkins (event_key, id, checked_in_at)
            VALUES ($1, $2, $3::timestamptz)
            ON CONFLICT (event_key, id) DO UPDATE SET
                checked_in_at = EXCLUDED.checked_in_at
            "#,
        )
        .bind(event_key)
        .bind(guest_id)
        .bind(checked_in_at)
        .execute(&self.db)
        .await
        .map_err(|err| storage_error("postgres", err))?;

        Ok(())
    }

    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError> {
        // to_json renders timestamptz as ISO-8601 rather than the text cast's format.
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT id, to_json(checked_in_at) #>> '{}' AS checked_in_at_iso
            FROM checkins
            WHERE event_key = $1
            ORDER BY checked_in_at ASC
            "#,
        )
        .bind(event_key)
        .fetch_all(&self.db)
        .await
        .map_err(|err| storage_error("postgres", err))?;

        Ok(rows
            .into_iter()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, checked_in_at)| CheckinRecord { id, checked_in_at })
            .collect())
    }
}

// Redis-backed check-in store: one hash per event, guest id as field.
//
// The connection manager opens on first use and is shared by every later call, so an
// unreachable server fails that request instead of startup. No retries are configured.
#[derive(Clone)]
pub struct RedisCheckinStore {
    client: redis::Client,
    connection: Arc<OnceCell<ConnectionManager>>,
}

impl RedisCheckinStore {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            connection: Arc::new(OnceCell::new()),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, CheckinError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let config = ConnectionManagerConfig::new()
                    .set_number_of_retries(0)
                    .set_connection_timeout(REDIS_CONNECT_TIMEOUT);
                self.client
                    .get_connection_manager_with_config(config)
                    .await
            })
            .await
            .map_err(|err| storage_error("redis", err))?;

        Ok(manager.clone())
    }
}

#[async_trait]
impl CheckinStore for RedisCheckinStore {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError> {
        let mut conn = self.connection().await?;

        let _: () = conn
            .hset(event_key, guest_id, checked_in_at)
            .await
            .map_err(|err| storage_error("redis", err))?;

        Ok(())
    }

    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError> {
        let mut conn = self.connection().await?;

        let entries: HashMap<String, String> = conn
            .hgetall(event_key)
            .await
            .map_err(|err| storage_error("redis", err))?;

        Ok(entries
            .into_iter()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, checked_in_at)| CheckinRecord { id, checked_in_at })
            .collect())
    }
}

type EventTable = HashMap<String, HashMap<String, String>>;

// In-memory check-in store for local runs and tests.
#[derive(Clone, Default)]
pub struct InMemoryCheckinStore {
    pub checkins: Arc<Mutex<EventTable>>,
}

#[async_trait]
impl CheckinStore for InMemoryCheckinStore {
    async fn upsert_checkin(
        &self,
        event_key: &str,
        guest_id: &str,
        checked_in_at: &str,
    ) -> Result<(), CheckinError> {
        let mut checkins = self.checkins.lock().await;
        checkins
            .entry(event_key.to_string())
            .or_default()
            .insert(guest_id.to_string(), checked_in_at.to_string());
        Ok(())
    }

    async fn list_checkins(&self, event_key: &str) -> Result<Vec<CheckinRecord>, CheckinError> {
        let checkins = self.checkins.lock().await;
        Ok(checkins
            .get(event_key)
            .into_iter()
            .flatten()
            .filter(|(id, _)| !id.is_empty())
            .map(|(id, checked_in_at)| CheckinRecord {
                id: id.clone(),
                checked_in_at: checked_in_at.clone(),
            })
            .collect())
    }
}
