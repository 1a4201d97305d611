//! Repository for the `experiences` table.

use chrono::NaiveDate;
use praxis_core::listing::{PageRequest, SortDirection};
use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::experience::{Experience, ExperienceFilter};

const COLUMNS: &str =
    "id, created_by, title, description, status, start_date, end_date, tags, created_at, updated_at";

const FILTER: &str = "created_by = $1 \
    AND ($2::TEXT IS NULL OR status = $2) \
    AND ($3::TEXT IS NULL OR $3 = ANY(tags)) \
    AND ($4::TEXT IS NULL OR title ILIKE $4 OR description ILIKE $4)";

/// Fully-resolved column values for an insert or update.
///
/// The service merges partial updates against the stored row before
/// writing, so the date range check sees the final values.
#[derive(Debug, Clone)]
pub struct ExperienceFields<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub tags: &'a [String],
}

pub struct ExperienceRepo;

impl ExperienceRepo {
    /// Insert a new `DRAFT` experience.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        fields: &ExperienceFields<'_>,
    ) -> Result<Experience, sqlx::Error> {
        let query = format!(
            "INSERT INTO experiences (created_by, title, description, start_date, end_date, tags)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(created_by)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM experiences WHERE id = $1");
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_owner(
        pool: &PgPool,
        created_by: DbId,
        filter: &ExperienceFilter,
        sort_column: &str,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<Experience>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM experiences WHERE {FILTER}
             ORDER BY {sort_column} {direction}, id
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(created_by)
            .bind(&filter.status)
            .bind(&filter.tag)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_owner(
        pool: &PgPool,
        created_by: DbId,
        filter: &ExperienceFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM experiences WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(created_by)
            .bind(&filter.status)
            .bind(&filter.tag)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Count a user's experiences in the given status.
    pub async fn count_by_status(
        pool: &PgPool,
        created_by: DbId,
        status: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM experiences WHERE created_by = $1 AND status = $2")
            .bind(created_by)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the editable columns. Returns `None` if the row is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &ExperienceFields<'_>,
    ) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!(
            "UPDATE experiences SET
                title = $2,
                description = $3,
                start_date = $4,
                end_date = $5,
                tags = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .bind(fields.title)
            .bind(fields.description)
            .bind(fields.start_date)
            .bind(fields.end_date)
            .bind(fields.tags)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Experience>, sqlx::Error> {
        let query = format!(
            "UPDATE experiences SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Experience>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
