//! Learner snapshot persistence
//!
//! One row per learner key. Writes are fenced by the snapshot revision: a
//! row is only replaced by a strictly newer revision, so a slow writer can
//! never roll the stored state back.

use chrono::{SecondsFormat, Utc};
use sqlx::SqlitePool;

use flashdeck_algo::Snapshot;

use super::StoreError;

pub const DEFAULT_KEY: &str = "local";

#[derive(Clone)]
pub struct SnapshotStore {
    pool: SqlitePool,
    key: String,
}

impl SnapshotStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_key(pool, DEFAULT_KEY)
    }

    pub fn with_key(pool: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// Loads and upgrades the stored snapshot, if any
    pub async fn load(&self, required_per_direction: u8) -> Result<Option<Snapshot>, StoreError> {
        let payload: Option<String> =
            sqlx::query_scalar(r#"SELECT "payload" FROM "snapshots" WHERE "key" = ?"#)
                .bind(&self.key)
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(|raw| Snapshot::from_json(&raw, required_per_direction))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Stores `snapshot` unless a newer or equal revision is already stored.
    /// Returns whether the row was written.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<bool, StoreError> {
        let payload = snapshot.to_json()?;
        let revision = i64::try_from(snapshot.revision).unwrap_or(i64::MAX);
        let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let result = sqlx::query(
            r#"
            INSERT INTO "snapshots" ("key", "payload", "revision", "updated_at")
            VALUES (?, ?, ?, ?)
            ON CONFLICT("key") DO UPDATE SET
                "payload" = excluded."payload",
                "revision" = excluded."revision",
                "updated_at" = excluded."updated_at"
            WHERE excluded."revision" > "snapshots"."revision"
            "#,
        )
        .bind(&self.key)
        .bind(payload)
        .bind(revision)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revision(&self) -> Result<Option<u64>, StoreError> {
        let revision: Option<i64> =
            sqlx::query_scalar(r#"SELECT "revision" FROM "snapshots" WHERE "key" = ?"#)
                .bind(&self.key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(revision.map(|r| r.max(0) as u64))
    }
}
