use crate::{
    config::DatabaseConfig,
    error::EvcoError,
    models::{ColumnInfo, MigrationStatus},
};
use sqlx::migrate::{Migration, Migrator};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::borrow::Cow;
use std::time::Duration;

/// Every schema change shipped with the platform, embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct MigrationService {
    pool: PgPool,
}

impl MigrationService {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, EvcoError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;

        tracing::info!("Database connected successfully");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending migrations, all of them or only those up to and
    /// including `target`, and returns the versions that ran.
    pub async fn up(&self, target: Option<i64>) -> Result<Vec<i64>, EvcoError> {
        let before = self.applied_versions().await?;

        match target {
            None => {
                tracing::info!("Running database migrations...");
                MIGRATOR.run(&self.pool).await?;
            }
            Some(target) => {
                tracing::info!("Running database migrations up to version {}", target);
                let mut migrator = Migrator {
                    migrations: Cow::Owned(migrations_up_to(target)?),
                    ..Migrator::DEFAULT
                };
                // Versions above the target may already be applied
                migrator.set_ignore_missing(true);
                migrator.run(&self.pool).await?;
            }
        }

        let after = self.applied_versions().await?;
        let applied: Vec<i64> = after.into_iter().filter(|v| !before.contains(v)).collect();

        tracing::info!("Migrations completed: {} applied", applied.len());
        Ok(applied)
    }

    /// Reverts the last `steps` applied migrations, newest first, and returns
    /// the versions that were reverted.
    pub async fn down(&self, steps: usize) -> Result<Vec<i64>, EvcoError> {
        let applied = self.applied_versions().await?;
        let (target, reverted) = revert_plan(&applied, steps);

        if reverted.is_empty() {
            tracing::info!("Nothing to revert");
            return Ok(reverted);
        }

        tracing::info!("Reverting migrations down to version {}", target);
        MIGRATOR.undo(&self.pool, target).await?;

        Ok(reverted)
    }

    pub async fn status(&self) -> Result<Vec<MigrationStatus>, EvcoError> {
        let applied = self.applied_versions().await?;

        Ok(MIGRATOR
            .iter()
            .filter(|m| m.migration_type.is_up_migration())
            .map(|m| MigrationStatus {
                version: m.version,
                description: m.description.to_string(),
                applied: applied.contains(&m.version),
            })
            .collect())
    }

    /// Column layout of `table` in the current schema, in ordinal order.
    pub async fn describe(&self, table: &str) -> Result<Vec<ColumnInfo>, EvcoError> {
        let columns = sqlx::query_as::<_, ColumnInfo>(
            r#"
            SELECT column_name::text AS column_name,
                   data_type::text AS data_type,
                   udt_name::text AS udt_name,
                   (is_nullable = 'YES') AS is_nullable,
                   character_maximum_length::int4 AS character_maximum_length
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            ORDER BY ordinal_position
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        if columns.is_empty() {
            return Err(EvcoError::TableNotFound(table.to_string()));
        }

        Ok(columns)
    }

    /// Versions recorded as successfully applied, ascending. Empty when the
    /// bookkeeping table has not been created yet.
    pub async fn applied_versions(&self) -> Result<Vec<i64>, EvcoError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT to_regclass(current_schema() || '._sqlx_migrations') IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        if !exists {
            return Ok(Vec::new());
        }

        let versions = sqlx::query_scalar::<_, i64>(
            "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(versions)
    }

    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}

/// Up and down halves of every migration with `version <= target`.
pub fn migrations_up_to(target: i64) -> Result<Vec<Migration>, EvcoError> {
    if !MIGRATOR.iter().any(|m| m.version == target) {
        return Err(EvcoError::UnknownMigration(target));
    }

    Ok(MIGRATOR
        .iter()
        .filter(|m| m.version <= target)
        .cloned()
        .collect())
}

/// Given ascending applied versions, returns the version to undo down to and
/// the versions that will be reverted (newest first).
pub fn revert_plan(applied: &[i64], steps: usize) -> (i64, Vec<i64>) {
    let steps = steps.min(applied.len());
    let keep = applied.len() - steps;

    let reverted: Vec<i64> = applied[keep..].iter().rev().copied().collect();
    let target = if keep == 0 { 0 } else { applied[keep - 1] };

    (target, reverted)
}
