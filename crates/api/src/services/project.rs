//! Client projects: catalogue, lifecycle and team assignment.

use praxis_core::context::{Identity, RequestContext};
use praxis_core::error::{CoreError, ErrorCode};
use praxis_core::listing::{resolve_sort_field, search_pattern, PageRequest, Paginated, SortDirection};
use praxis_core::project::{self, APPROVAL_APPROVED, STATUS_PUBLISHED};
use praxis_core::roles::{ROLE_ADMIN, ROLE_CLIENT};
use praxis_core::types::DbId;
use praxis_core::validation::ValidationError;
use praxis_db::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use praxis_db::repositories::ProjectRepo;
use praxis_db::DbPool;
use praxis_events::NotificationPush;

use crate::error::AppResult;
use crate::notifications::Notifier;
use crate::query::{non_blank, ProjectListQuery};

const KIND: &str = "project";

#[derive(Clone)]
pub struct ProjectService {
    pool: DbPool,
    notifier: Notifier,
}

impl ProjectService {
    pub fn new(pool: DbPool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Create a draft project pending approval.
    ///
    /// `client_id` defaults to the caller; only admins may create on behalf
    /// of another client.
    pub async fn create(&self, ctx: &RequestContext, input: CreateProject) -> AppResult<Project> {
        let caller = ctx.require_role(&[ROLE_CLIENT, ROLE_ADMIN])?;

        let client_id = input.client_id.unwrap_or(caller.user_id);
        if client_id != caller.user_id && !caller.has_role(ROLE_ADMIN) {
            return Err(CoreError::forbidden("Only admins can create projects for another client").into());
        }

        let input = CreateProject {
            client_id: Some(client_id),
            title: non_blank_title(&input.title)?,
            description: input.description,
            required_skills: project::normalize_skills(&input.required_skills),
        };
        let created = ProjectRepo::create(&self.pool, client_id, caller.user_id, &input).await?;
        tracing::info!(project_id = %created.id, client_id = %client_id, "Project created");

        self.notify(
            ctx,
            created.client_id,
            &created,
            "Project created",
            format!("\"{}\" was created and is awaiting approval", created.title),
        );
        Ok(created)
    }

    /// The public catalogue.
    ///
    /// Only published, approved projects are listed; a status filter narrows
    /// that further. Admins filtering by status see every project.
    pub async fn find_all(
        &self,
        ctx: &RequestContext,
        query: &ProjectListQuery,
    ) -> AppResult<Paginated<Project>> {
        let status = non_blank(&query.status);
        if let Some(status) = &status {
            project::validate_status(status)?;
        }
        let is_admin = ctx.identity.as_ref().is_some_and(|i| i.has_role(ROLE_ADMIN));
        let filter = ProjectFilter {
            public_only: !(is_admin && status.is_some()),
            status,
            client_id: query.client_id,
            skill: non_blank(&query.skill),
            search: search_pattern(query.search.as_deref()),
            managed_by: None,
        };
        self.list(&filter, query).await
    }

    /// Every project the caller owns or created, in any status.
    pub async fn find_mine(
        &self,
        ctx: &RequestContext,
        query: &ProjectListQuery,
    ) -> AppResult<Paginated<Project>> {
        let caller = ctx.require_identity()?;

        let status = non_blank(&query.status);
        if let Some(status) = &status {
            project::validate_status(status)?;
        }
        let filter = ProjectFilter {
            managed_by: Some(caller.user_id),
            client_id: query.client_id,
            status,
            public_only: false,
            skill: non_blank(&query.skill),
            search: search_pattern(query.search.as_deref()),
        };
        self.list(&filter, query).await
    }

    /// Fetch a project and count the view.
    ///
    /// Projects outside the public catalogue are reported as missing to
    /// anyone but their managers and admins.
    pub async fn find_one(&self, ctx: &RequestContext, id: DbId) -> AppResult<Project> {
        let mut found = self.load(id).await?;
        let visible = project::is_public(&found.status, &found.approval_status)
            || ctx.identity.as_ref().is_some_and(|caller| {
                caller.has_role(ROLE_ADMIN)
                    || project::is_manager(found.client_id, found.created_by, caller)
            });
        if !visible {
            return Err(CoreError::not_found("Project", id).into());
        }

        ProjectRepo::increment_view_count(&self.pool, id).await?;
        found.view_count += 1;
        Ok(found)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: DbId,
        input: UpdateProject,
    ) -> AppResult<Project> {
        let caller = ctx.require_identity()?;
        let existing = self.load_owned(caller, id).await?;
        project::ensure_editable(&existing.status)?;

        let input = UpdateProject {
            title: input.title.as_deref().map(non_blank_title).transpose()?,
            description: input.description,
            required_skills: input
                .required_skills
                .map(|skills| project::normalize_skills(&skills)),
        };
        let updated = ProjectRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", id))?;
        tracing::info!(project_id = %id, "Project updated");
        Ok(updated)
    }

    /// Move a project along its lifecycle. Publishing requires approval and
    /// work only starts through `assign_team`.
    pub async fn change_status(
        &self,
        ctx: &RequestContext,
        id: DbId,
        status: &str,
    ) -> AppResult<Project> {
        let caller = ctx.require_identity()?;
        let existing = self.load_owned(caller, id).await?;

        project::validate_manual_transition(&existing.status, status)?;
        if status == STATUS_PUBLISHED {
            project::ensure_publishable(&existing.approval_status)?;
        }

        let updated = ProjectRepo::set_status(&self.pool, id, status)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", id))?;
        tracing::info!(project_id = %id, from = %existing.status, to = %status, "Project status changed");

        self.notify(
            ctx,
            updated.client_id,
            &updated,
            "Project status updated",
            format!("\"{}\" is now {}", updated.title, updated.status),
        );
        Ok(updated)
    }

    pub async fn publish(&self, ctx: &RequestContext, id: DbId) -> AppResult<Project> {
        self.change_status(ctx, id, STATUS_PUBLISHED).await
    }

    /// Admin approval, required before a project can be published.
    pub async fn approve(&self, ctx: &RequestContext, id: DbId) -> AppResult<Project> {
        ctx.require_role(&[ROLE_ADMIN])?;
        let existing = self.load(id).await?;
        if existing.approval_status == APPROVAL_APPROVED {
            return Err(CoreError::invalid_state("Project is already approved").into());
        }

        let approved = ProjectRepo::set_approval(&self.pool, id, APPROVAL_APPROVED)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", id))?;
        tracing::info!(project_id = %id, "Project approved");

        self.notify(
            ctx,
            approved.client_id,
            &approved,
            "Project approved",
            format!("\"{}\" was approved and can now be published", approved.title),
        );
        Ok(approved)
    }

    /// Hand a published project to a team, which starts the work.
    pub async fn assign_team(
        &self,
        ctx: &RequestContext,
        id: DbId,
        team_id: DbId,
    ) -> AppResult<Project> {
        let caller = ctx.require_identity()?;
        let existing = self.load_owned(caller, id).await?;
        project::ensure_assignable(&existing.status, existing.assigned_team_id)?;

        let assigned = ProjectRepo::assign_team(&self.pool, id, team_id)
            .await?
            .ok_or_else(|| {
                CoreError::with_message(
                    ErrorCode::Conflict,
                    "Project was assigned or changed by another request",
                )
            })?;
        tracing::info!(project_id = %id, team_id = %team_id, "Team assigned to project");

        self.notify(
            ctx,
            assigned.client_id,
            &assigned,
            "Team assigned",
            format!("A team was assigned to \"{}\"", assigned.title),
        );
        Ok(assigned)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: DbId) -> AppResult<()> {
        let caller = ctx.require_identity()?;
        let existing = self.load_owned(caller, id).await?;
        project::ensure_deletable(existing.assigned_team_id)?;

        if !ProjectRepo::delete(&self.pool, id).await? {
            return Err(CoreError::not_found("Project", id).into());
        }
        tracing::info!(project_id = %id, "Project deleted");

        self.notify(
            ctx,
            existing.client_id,
            &existing,
            "Project deleted",
            format!("\"{}\" was deleted", existing.title),
        );
        Ok(())
    }

    // -- helpers ------------------------------------------------------------

    async fn list(
        &self,
        filter: &ProjectFilter,
        query: &ProjectListQuery,
    ) -> AppResult<Paginated<Project>> {
        let sort_field = resolve_sort_field(
            query.sort_by.as_deref(),
            project::SORT_FIELDS,
            project::DEFAULT_SORT_FIELD,
        )?;
        let direction = SortDirection::parse(query.sort_order.as_deref());
        let page = PageRequest::new(query.page, query.limit);

        let items = ProjectRepo::list(
            &self.pool,
            filter,
            project::sort_column(sort_field),
            direction,
            page,
        )
        .await?;
        let total = ProjectRepo::count(&self.pool, filter).await?;
        Ok(Paginated::new(items, total, page))
    }

    async fn load(&self, id: DbId) -> AppResult<Project> {
        Ok(ProjectRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| CoreError::not_found("Project", id))?)
    }

    async fn load_owned(&self, caller: &Identity, id: DbId) -> AppResult<Project> {
        let found = self.load(id).await?;
        project::ensure_manager(found.client_id, found.created_by, caller)?;
        Ok(found)
    }

    fn notify(
        &self,
        ctx: &RequestContext,
        recipient: DbId,
        project: &Project,
        title: &str,
        message: String,
    ) {
        self.notifier.push(
            ctx,
            NotificationPush::new(recipient, KIND, title, message).with_data(serde_json::json!({
                "project_id": project.id,
                "status": project.status,
            })),
        );
    }
}

fn non_blank_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::single("title", "title must not be blank"));
    }
    Ok(title.to_string())
}
