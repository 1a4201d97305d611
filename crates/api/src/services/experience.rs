//! Student experiences and their draft/publish quotas.

use praxis_core::context::{ensure_owner, Identity, RequestContext};
use praxis_core::error::CoreError;
use praxis_core::experience::{self, STATUS_ARCHIVED, STATUS_DRAFT, STATUS_PUBLISHED};
use praxis_core::listing::{resolve_sort_field, search_pattern, PageRequest, Paginated, SortDirection};
use praxis_core::roles::ROLE_STUDENT;
use praxis_core::types::DbId;
use praxis_core::validation::ValidationError;
use praxis_db::models::experience::{
    CreateExperience, Experience, ExperienceFilter, UpdateExperience,
};
use praxis_db::repositories::experience_repo::ExperienceFields;
use praxis_db::repositories::ExperienceRepo;
use praxis_db::DbPool;
use praxis_events::NotificationPush;

use crate::error::AppResult;
use crate::notifications::Notifier;
use crate::query::{non_blank, ExperienceListQuery};

const KIND: &str = "experience";

#[derive(Clone)]
pub struct ExperienceService {
    pool: DbPool,
    notifier: Notifier,
}

impl ExperienceService {
    pub fn new(pool: DbPool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Create a new draft. Fails once the student already holds the
    /// maximum number of drafts.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateExperience,
    ) -> AppResult<Experience> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;

        let title = input.title.trim();
        if title.is_empty() {
            return Err(ValidationError::single("title", "title must not be blank").into());
        }
        experience::validate_date_range(input.start_date, input.end_date)?;

        let drafts = ExperienceRepo::count_by_status(&self.pool, student_id, STATUS_DRAFT).await?;
        experience::check_draft_quota(drafts)?;

        let tags = experience::normalize_tags(&input.tags);
        let fields = ExperienceFields {
            title,
            description: input.description.as_deref(),
            start_date: input.start_date,
            end_date: input.end_date,
            tags: &tags,
        };
        let created = ExperienceRepo::create(&self.pool, student_id, &fields).await?;
        tracing::info!(experience_id = %created.id, student_id = %student_id, "Experience created");

        self.notify(ctx, &created, "Experience created", "Your experience was saved as a draft");
        Ok(created)
    }

    /// One page of the caller's experiences.
    pub async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &ExperienceListQuery,
    ) -> AppResult<Paginated<Experience>> {
        let student_id = ctx.require_role(&[ROLE_STUDENT])?.user_id;

        let status = non_blank(&query.status);
        if let Some(status) = &status {
            experience::validate_status(status)?;
        }
        let filter = ExperienceFilter {
            status,
            tag: non_blank(&query.tag),
            search: search_pattern(query.search.as_deref()),
        };

        let sort_field = resolve_sort_field(
            query.sort_by.as_deref(),
            experience::SORT_FIELDS,
            experience::DEFAULT_SORT_FIELD,
        )?;
        let direction = SortDirection::parse(query.sort_order.as_deref());
        let page = PageRequest::new(query.page, query.limit);

        // Every allow-listed field is a plain column of `experiences`.
        let items =
            ExperienceRepo::list_for_owner(&self.pool, student_id, &filter, sort_field, direction, page)
                .await?;
        let total = ExperienceRepo::count_for_owner(&self.pool, student_id, &filter).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn find_one(&self, ctx: &RequestContext, id: DbId) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        self.load_owned(student, id).await
    }

    /// Apply a partial update. The date range is checked against the
    /// merged start and end dates. An explicit `null` clears `description`
    /// or `end_date`.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DbId,
        input: UpdateExperience,
    ) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;

        let title = match input.title.as_deref().map(str::trim) {
            Some("") => {
                return Err(ValidationError::single("title", "title must not be blank").into())
            }
            Some(title) => title,
            None => existing.title.as_str(),
        };
        let start_date = input.start_date.unwrap_or(existing.start_date);
        let end_date = input.end_date.unwrap_or(existing.end_date);
        experience::validate_date_range(start_date, end_date)?;

        let tags = match &input.tags {
            Some(tags) => experience::normalize_tags(tags),
            None => existing.tags.clone(),
        };
        let fields = ExperienceFields {
            title,
            description: match &input.description {
                Some(description) => description.as_deref(),
                None => existing.description.as_deref(),
            },
            start_date,
            end_date,
            tags: &tags,
        };

        let updated = ExperienceRepo::update(&self.pool, id, &fields)
            .await?
            .ok_or_else(|| CoreError::not_found("Experience", id))?;
        tracing::info!(experience_id = %id, "Experience updated");

        self.notify(ctx, &updated, "Experience updated", "Your experience was updated");
        Ok(updated)
    }

    /// DRAFT -> PUBLISHED, subject to the published quota.
    pub async fn publish(&self, ctx: &RequestContext, id: DbId) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;
        if existing.status != STATUS_DRAFT {
            return Err(CoreError::invalid_state("Only draft experiences can be published").into());
        }

        let published =
            ExperienceRepo::count_by_status(&self.pool, student.user_id, STATUS_PUBLISHED).await?;
        experience::check_published_quota(published)?;

        let updated = self.transition(&existing, STATUS_PUBLISHED).await?;
        self.notify(ctx, &updated, "Experience published", "Your experience is now published");
        Ok(updated)
    }

    /// PUBLISHED -> DRAFT, subject to the draft quota.
    pub async fn unpublish(&self, ctx: &RequestContext, id: DbId) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;
        if existing.status != STATUS_PUBLISHED {
            return Err(CoreError::invalid_state("Only published experiences can be unpublished").into());
        }

        let drafts =
            ExperienceRepo::count_by_status(&self.pool, student.user_id, STATUS_DRAFT).await?;
        experience::check_draft_quota(drafts)?;

        let updated = self.transition(&existing, STATUS_DRAFT).await?;
        self.notify(ctx, &updated, "Experience unpublished", "Your experience was moved back to drafts");
        Ok(updated)
    }

    pub async fn archive(&self, ctx: &RequestContext, id: DbId) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;

        let updated = self.transition(&existing, STATUS_ARCHIVED).await?;
        self.notify(ctx, &updated, "Experience archived", "Your experience was archived");
        Ok(updated)
    }

    /// ARCHIVED -> DRAFT, subject to the draft quota.
    pub async fn unarchive(&self, ctx: &RequestContext, id: DbId) -> AppResult<Experience> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;
        if existing.status != STATUS_ARCHIVED {
            return Err(CoreError::invalid_state("Only archived experiences can be unarchived").into());
        }

        let drafts =
            ExperienceRepo::count_by_status(&self.pool, student.user_id, STATUS_DRAFT).await?;
        experience::check_draft_quota(drafts)?;

        let updated = self.transition(&existing, STATUS_DRAFT).await?;
        self.notify(ctx, &updated, "Experience restored", "Your experience was moved back to drafts");
        Ok(updated)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: DbId) -> AppResult<()> {
        let student = ctx.require_role(&[ROLE_STUDENT])?;
        let existing = self.load_owned(student, id).await?;

        if !ExperienceRepo::delete(&self.pool, id).await? {
            return Err(CoreError::not_found("Experience", id).into());
        }
        tracing::info!(experience_id = %id, "Experience deleted");

        self.notify(ctx, &existing, "Experience deleted", "Your experience was deleted");
        Ok(())
    }

    // -- helpers ------------------------------------------------------------

    async fn transition(&self, existing: &Experience, next: &str) -> AppResult<Experience> {
        experience::validate_transition(&existing.status, next)?;
        let updated = ExperienceRepo::set_status(&self.pool, existing.id, next)
            .await?
            .ok_or_else(|| CoreError::not_found("Experience", existing.id))?;
        tracing::info!(
            experience_id = %existing.id,
            from = %existing.status,
            to = %next,
            "Experience status changed"
        );
        Ok(updated)
    }

    async fn load_owned(&self, student: &Identity, id: DbId) -> AppResult<Experience> {
        let found = ExperienceRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Experience", id))?;
        ensure_owner(found.created_by, student, "Experience")?;
        Ok(found)
    }

    fn notify(&self, ctx: &RequestContext, experience: &Experience, title: &str, message: &str) {
        self.notifier.push(
            ctx,
            NotificationPush::new(experience.created_by, KIND, title, message).with_data(
                serde_json::json!({
                    "experience_id": experience.id,
                    "status": experience.status,
                }),
            ),
        );
    }
}
