//! Repository for the `bookmarks` table.
//!
//! Inserts and deletes keep `projects.bookmark_count` in step inside the
//! same transaction.

use praxis_core::listing::{PageRequest, SortDirection};
use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::bookmark::{Bookmark, BookmarkFilter, BookmarkWithProject, CreateBookmark};

const COLUMNS: &str = "id, student_id, project_id, shared_by, notes, created_at, updated_at";

/// Columns for the joined list view. Bookmark columns are aliased `b`,
/// project columns `p`.
const LIST_COLUMNS: &str = "b.id, b.student_id, b.project_id, b.shared_by, b.notes, \
    b.created_at, b.updated_at, p.title AS project_title, p.status AS project_status, \
    p.required_skills AS project_required_skills";

const LIST_FILTER: &str = "b.student_id = $1 \
    AND ($2::TEXT IS NULL OR p.status = $2) \
    AND ($3::TEXT IS NULL OR p.title ILIKE $3)";

pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Insert a bookmark and bump the project's `bookmark_count`.
    pub async fn create(
        pool: &PgPool,
        student_id: DbId,
        input: &CreateBookmark,
    ) -> Result<Bookmark, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO bookmarks (student_id, project_id, shared_by, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let bookmark = sqlx::query_as::<_, Bookmark>(&query)
            .bind(student_id)
            .bind(input.project_id)
            .bind(input.shared_by)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE projects SET bookmark_count = bookmark_count + 1 WHERE id = $1")
            .bind(input.project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(bookmark)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bookmark>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookmarks WHERE id = $1");
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(
        pool: &PgPool,
        student_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE student_id = $1 AND project_id = $2)",
        )
        .bind(student_id)
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    pub async fn count_for_student(pool: &PgPool, student_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(pool)
            .await
    }

    /// List one page of a student's bookmarks joined with their projects.
    ///
    /// `sort_column` must be one of the `b.`/`p.` expressions from the
    /// bookmark sort allow-list.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        filter: &BookmarkFilter,
        sort_column: &str,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<BookmarkWithProject>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS}
             FROM bookmarks b
             JOIN projects p ON p.id = b.project_id
             WHERE {LIST_FILTER}
             ORDER BY {sort_column} {direction}, b.id
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, BookmarkWithProject>(&query)
            .bind(student_id)
            .bind(&filter.project_status)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_list_for_student(
        pool: &PgPool,
        student_id: DbId,
        filter: &BookmarkFilter,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)
             FROM bookmarks b
             JOIN projects p ON p.id = b.project_id
             WHERE {LIST_FILTER}"
        );
        sqlx::query_scalar(&query)
            .bind(student_id)
            .bind(&filter.project_status)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Replace a bookmark's notes. Returns `None` if the row is gone.
    pub async fn update_notes(
        pool: &PgPool,
        id: DbId,
        notes: Option<&str>,
    ) -> Result<Option<Bookmark>, sqlx::Error> {
        let query = format!(
            "UPDATE bookmarks SET notes = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a bookmark and decrement its project's `bookmark_count`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project_id: Option<DbId> =
            sqlx::query_scalar("DELETE FROM bookmarks WHERE id = $1 RETURNING project_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(project_id) = project_id else {
            return Ok(false);
        };

        sqlx::query(
            "UPDATE projects SET bookmark_count = GREATEST(bookmark_count - 1, 0) WHERE id = $1",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Count how many of `ids` belong to `student_id`.
    pub async fn count_owned(
        pool: &PgPool,
        student_id: DbId,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookmarks WHERE student_id = $1 AND id = ANY($2)",
        )
        .bind(student_id)
        .bind(ids)
        .fetch_one(pool)
        .await
    }

    /// Delete every bookmark in `ids` owned by `student_id` and decrement
    /// the affected project counters, all in one transaction.
    ///
    /// Returns the number of bookmarks removed.
    pub async fn delete_many(
        pool: &PgPool,
        student_id: DbId,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project_ids: Vec<DbId> = sqlx::query_scalar(
            "DELETE FROM bookmarks WHERE student_id = $1 AND id = ANY($2) RETURNING project_id",
        )
        .bind(student_id)
        .bind(ids)
        .fetch_all(&mut *tx)
        .await?;

        // A student holds at most one bookmark per project, so each id
        // appears once here.
        sqlx::query(
            "UPDATE projects SET bookmark_count = GREATEST(bookmark_count - 1, 0)
             WHERE id = ANY($1)",
        )
        .bind(&project_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(project_ids.len() as u64)
    }
}
