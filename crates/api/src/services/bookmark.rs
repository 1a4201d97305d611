//! Student bookmarks on projects.

use praxis_core::bookmark::{self, MSG_ALREADY_BOOKMARKED, MSG_INVALID_IDS};
use praxis_core::context::{ensure_owner, Identity, RequestContext};
use praxis_core::error::CoreError;
use praxis_core::listing::{resolve_sort_field, search_pattern, PageRequest, Paginated, SortDirection};
use praxis_core::project;
use praxis_core::roles::ROLE_STUDENT;
use praxis_core::types::DbId;
use praxis_db::models::bookmark::{
    Bookmark, BookmarkFilter, BookmarkWithProject, CreateBookmark, UpdateBookmark,
};
use praxis_db::repositories::{BookmarkRepo, ProjectRepo};
use praxis_db::DbPool;
use praxis_events::NotificationPush;

use crate::error::{AppError, AppResult};
use crate::notifications::Notifier;
use crate::query::{non_blank, BookmarkListQuery};

const KIND: &str = "bookmark";

#[derive(Clone)]
pub struct BookmarkService {
    pool: DbPool,
    notifier: Notifier,
}

impl BookmarkService {
    pub fn new(pool: DbPool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Bookmark a project for the calling student.
    ///
    /// Notifies the student, and the sharer too when `shared_by` is set.
    pub async fn create(&self, ctx: &RequestContext, input: CreateBookmark) -> AppResult<Bookmark> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;

        let project = ProjectRepo::find_by_id(&self.pool, input.project_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", input.project_id))?;

        if BookmarkRepo::exists(&self.pool, student_id, project.id).await? {
            return Err(CoreError::already_exists(MSG_ALREADY_BOOKMARKED)
                .context_value("project_id", project.id.to_string())
                .into());
        }

        let count = BookmarkRepo::count_for_student(&self.pool, student_id).await?;
        bookmark::check_quota(count)?;

        let bookmark = BookmarkRepo::create(&self.pool, student_id, &input)
            .await
            .map_err(|e| {
                // Lost a race with a concurrent request for the same pair.
                if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                    AppError::Core(CoreError::already_exists(MSG_ALREADY_BOOKMARKED))
                } else {
                    AppError::Database(e)
                }
            })?;

        tracing::info!(
            bookmark_id = %bookmark.id,
            project_id = %project.id,
            student_id = %student_id,
            "Bookmark created"
        );

        let data = serde_json::json!({
            "bookmark_id": bookmark.id,
            "project_id": project.id,
        });
        self.notifier.push(
            ctx,
            NotificationPush::new(
                student_id,
                KIND,
                "Saved to bookmarks",
                format!("\"{}\" was saved to your bookmarks", project.title),
            )
            .with_data(data.clone()),
        );
        if let Some(sharer) = bookmark.shared_by {
            self.notifier.push(
                ctx,
                NotificationPush::new(
                    sharer,
                    KIND,
                    "Shared project saved",
                    "Student saved your shared project",
                )
                .with_data(data),
            );
        }

        Ok(bookmark)
    }

    /// One page of the caller's bookmarks with project summaries.
    pub async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &BookmarkListQuery,
    ) -> AppResult<Paginated<BookmarkWithProject>> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;

        let project_status = non_blank(&query.project_status);
        if let Some(status) = &project_status {
            project::validate_status(status)?;
        }
        let filter = BookmarkFilter {
            project_status,
            search: search_pattern(query.search.as_deref()),
        };

        let sort_field = resolve_sort_field(
            query.sort_by.as_deref(),
            bookmark::SORT_FIELDS,
            bookmark::DEFAULT_SORT_FIELD,
        )?;
        let direction = SortDirection::parse(query.sort_order.as_deref());
        let page = PageRequest::new(query.page, query.limit);

        let items = BookmarkRepo::list_for_student(
            &self.pool,
            student_id,
            &filter,
            bookmark::sort_column(sort_field),
            direction,
            page,
        )
        .await?;
        let total = BookmarkRepo::count_list_for_student(&self.pool, student_id, &filter).await?;

        Ok(Paginated::new(items, total, page))
    }

    pub async fn find_one(&self, ctx: &RequestContext, id: DbId) -> AppResult<Bookmark> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        self.load_owned(student, id).await
    }

    pub async fn is_bookmarked(&self, ctx: &RequestContext, project_id: DbId) -> AppResult<bool> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;
        Ok(BookmarkRepo::exists(&self.pool, student_id, project_id).await?)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DbId,
        input: UpdateBookmark,
    ) -> AppResult<Bookmark> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        self.load_owned(student, id).await?;

        let notes = input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());
        BookmarkRepo::update_notes(&self.pool, id, notes)
            .await?
            .ok_or_else(|| CoreError::not_found("Bookmark", id).into())
    }

    /// Delete one of the caller's bookmarks.
    pub async fn remove(&self, ctx: &RequestContext, id: DbId) -> AppResult<()> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let bookmark = self.load_owned(student, id).await?;

        if !BookmarkRepo::delete(&self.pool, id).await? {
            return Err(CoreError::not_found("Bookmark", id).into());
        }
        tracing::info!(bookmark_id = %id, student_id = %student.user_id, "Bookmark removed");

        self.notifier.push(
            ctx,
            NotificationPush::new(
                student.user_id,
                KIND,
                "Removed from bookmarks",
                "A project was removed from your bookmarks",
            )
            .with_data(serde_json::json!({ "project_id": bookmark.project_id })),
        );
        Ok(())
    }

    /// Delete several of the caller's bookmarks at once.
    ///
    /// All-or-nothing: if any id is unknown or belongs to someone else,
    /// nothing is deleted. Returns the number of bookmarks removed.
    pub async fn bulk_delete(&self, ctx: &RequestContext, ids: &[DbId]) -> AppResult<u64> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;

        if ids.is_empty() {
            return Err(CoreError::invalid_input("No bookmark IDs provided").into());
        }
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let owned = BookmarkRepo::count_owned(&self.pool, student_id, &ids).await?;
        if owned < ids.len() as i64 {
            return Err(CoreError::invalid_input(MSG_INVALID_IDS)
                .context_value("requested", ids.len())
                .context_value("found", owned)
                .into());
        }

        let deleted = BookmarkRepo::delete_many(&self.pool, student_id, &ids).await?;
        tracing::info!(student_id = %student_id, deleted, "Bookmarks bulk deleted");

        self.notifier.push(
            ctx,
            NotificationPush::new(
                student_id,
                KIND,
                "Removed from bookmarks",
                format!("{deleted} bookmarks were removed"),
            )
            .with_data(serde_json::json!({ "count": deleted })),
        );
        Ok(deleted)
    }

    async fn load_owned(&self, student: &Identity, id: DbId) -> AppResult<Bookmark> {
        let bookmark = BookmarkRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Bookmark", id))?;
        ensure_owner(bookmark.student_id, student, "Bookmark")?;
        Ok(bookmark)
    }
}
