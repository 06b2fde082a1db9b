//! Postgres-backed implementation of the selection store.
//!
//! # Purpose
//! Persists selections in the `selections` table so they survive restarts and
//! are shared by every replica pointed at the same database.
//!
//! # Key invariants
//! - A unique index on `user_id` backs the one-row-per-identity rule; the
//!   upsert is a single `INSERT .. ON CONFLICT` statement, so racing writers
//!   for the same identity resolve inside Postgres.
//! - `(xmax = 0)` in the `RETURNING` clause is true only for a freshly inserted
//!   row, which is how create and update are told apart without a second query.
//!
//! # Operational notes
//! - Migrations run at connect time via `sqlx::migrate!("./migrations")`.
//! - Database URLs may contain credentials; only the masked form is logged.
use super::{SelectionStore, StoreError, StoreResult};
use crate::config::{PostgresConfig, mask_database_url};
use crate::model::{Selection, Submission, UpsertOutcome};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Durable selection store backed by a pooled Postgres connection.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct DbSelection {
    id: i64,
    user_id: String,
    country: String,
    salary: i32,
    people: i32,
    work: i32,
}

// Row returned by the upsert; `inserted` separates create from update.
#[derive(Debug, Clone, FromRow)]
struct DbUpsert {
    #[sqlx(flatten)]
    row: DbSelection,
    inserted: bool,
}

impl From<DbSelection> for Selection {
    fn from(row: DbSelection) -> Self {
        Selection {
            id: row.id,
            user_id: row.user_id,
            country: row.country,
            salary: row.salary,
            people: row.people,
            work: row.work,
        }
    }
}

impl From<DbUpsert> for UpsertOutcome {
    fn from(upsert: DbUpsert) -> Self {
        if upsert.inserted {
            UpsertOutcome::Created(upsert.row.into())
        } else {
            UpsertOutcome::Updated(upsert.row.into())
        }
    }
}

fn connect_options(pg: &PostgresConfig) -> StoreResult<PgConnectOptions> {
    let ssl_mode = if pg.require_tls {
        PgSslMode::Require
    } else {
        PgSslMode::Prefer
    };
    Ok(PgConnectOptions::from_str(&pg.url)?.ssl_mode(ssl_mode))
}

impl PostgresStore {
    /// Connect, apply migrations, and seed the row-count gauge.
    ///
    /// # Errors
    /// - Malformed URL, connection, pool, or migration failures.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let options = connect_options(pg)?;
        tracing::info!(
            url = %mask_database_url(&pg.url),
            max_connections = pg.max_connections,
            require_tls = pg.require_tls,
            "connecting to postgres"
        );
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .max_lifetime(Duration::from_secs(pg.max_lifetime_secs))
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        // Handlers assume the schema exists, so a failed migration fails startup.
        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = Self { pool };
        let count = store.count_selections().await?;
        metrics::gauge!("proximity_selections_total").set(count as f64);
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SelectionStore for PostgresStore {
    async fn upsert_selection(&self, submission: Submission) -> StoreResult<UpsertOutcome> {
        let upsert = sqlx::query_as::<_, DbUpsert>(
            r#"INSERT INTO selections (user_id, country, salary, people, work)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (user_id) DO UPDATE
               SET country = EXCLUDED.country,
                   salary = EXCLUDED.salary,
                   people = EXCLUDED.people,
                   work = EXCLUDED.work
               RETURNING id, user_id, country, salary, people, work, (xmax = 0) AS inserted"#,
        )
        .bind(&submission.user_id)
        .bind(&submission.country)
        .bind(submission.salary)
        .bind(submission.people)
        .bind(submission.work)
        .fetch_one(&self.pool)
        .await?;

        let outcome = UpsertOutcome::from(upsert);
        if outcome.is_created() {
            metrics::gauge!("proximity_selections_total").increment(1.0);
        }
        Ok(outcome)
    }

    async fn get_selection(&self, user_id: &str) -> StoreResult<Selection> {
        sqlx::query_as::<_, DbSelection>(
            r#"SELECT id, user_id, country, salary, people, work FROM selections WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Selection::from)
        .ok_or_else(|| StoreError::NotFound("selection".into()))
    }

    async fn list_selections(&self) -> StoreResult<Vec<Selection>> {
        let rows = sqlx::query_as::<_, DbSelection>(
            r#"SELECT id, user_id, country, salary, people, work FROM selections ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Selection::from).collect())
    }

    async fn count_selections(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM selections")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
