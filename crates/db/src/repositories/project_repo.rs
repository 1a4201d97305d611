//! Repository for the `projects` table.

use praxis_core::listing::{PageRequest, SortDirection};
use praxis_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, client_id, created_by, title, description, required_skills, \
    status, approval_status, assigned_team_id, view_count, application_count, \
    bookmark_count, created_at, updated_at";

/// Shared `WHERE` clause for list and count queries.
///
/// `$5` switches on the public catalogue view (published + approved).
const FILTER: &str = "($1::UUID IS NULL OR client_id = $1 OR created_by = $1) \
    AND ($2::UUID IS NULL OR client_id = $2) \
    AND ($3::TEXT IS NULL OR status = $3) \
    AND ($4::TEXT IS NULL OR $4 = ANY(required_skills)) \
    AND (NOT $5 OR (status = 'published' AND approval_status = 'approved')) \
    AND ($6::TEXT IS NULL OR title ILIKE $6 OR description ILIKE $6)";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new draft project awaiting approval.
    ///
    /// `required_skills` is written as given; callers normalize it first.
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        created_by: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (client_id, created_by, title, description, required_skills)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(client_id)
            .bind(created_by)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.required_skills)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of projects matching `filter`.
    ///
    /// `sort_column` must come from the project sort allow-list.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectFilter,
        sort_column: &str,
        direction: SortDirection,
        page: PageRequest,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {FILTER}
             ORDER BY {sort_column} {direction}, id
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(filter.managed_by)
            .bind(filter.client_id)
            .bind(&filter.status)
            .bind(&filter.skill)
            .bind(filter.public_only)
            .bind(&filter.search)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count the projects matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ProjectFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM projects WHERE {FILTER}");
        sqlx::query_scalar(&query)
            .bind(filter.managed_by)
            .bind(filter.client_id)
            .bind(&filter.status)
            .bind(&filter.skill)
            .bind(filter.public_only)
            .bind(&filter.search)
            .fetch_one(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                required_skills = COALESCE($4, required_skills),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.required_skills)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_approval(
        pool: &PgPool,
        id: DbId,
        approval_status: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET approval_status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(approval_status)
            .fetch_optional(pool)
            .await
    }

    /// Hand a published project to a team and move it to `in_progress`.
    ///
    /// The `WHERE` guard makes this a no-op (returning `None`) if another
    /// request assigned the project first.
    pub async fn assign_team(
        pool: &PgPool,
        id: DbId,
        team_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                assigned_team_id = $2,
                status = 'in_progress',
                updated_at = NOW()
             WHERE id = $1 AND assigned_team_id IS NULL AND status = 'published'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(team_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE projects SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Permanently delete a project by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
