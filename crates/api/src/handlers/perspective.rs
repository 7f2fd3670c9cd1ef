//! Handlers for perspective groups, project association and member values.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelhub_core::error::CoreError;
use labelhub_core::perspective::PerspectiveKind;
use labelhub_core::types::DbId;
use labelhub_db::models::perspective::{
    CreatePerspectiveGroup, Perspective, PerspectiveMemberValue, PerspectiveProject,
};
use labelhub_db::repositories::{PerspectiveRepo, ProjectRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_member, require_project_admin};
use crate::state::AppState;

/// A perspective group with its fields and the projects referencing it.
#[derive(Debug, Serialize)]
pub struct PerspectiveGroupDetail {
    #[serde(flatten)]
    pub group: PerspectiveProject,
    pub items: Vec<Perspective>,
    pub projects: Vec<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct AssociateRequest {
    pub perspective_project_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct FillValuesRequest {
    /// (perspective id, value) pairs, upserted last-write-wins.
    pub values: Vec<FillValue>,
}

#[derive(Debug, Deserialize)]
pub struct FillValue {
    pub perspective_id: DbId,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct UsersWithValueQuery {
    pub perspective_id: DbId,
    pub value: String,
}

/// Values across the family grouped per perspective field.
#[derive(Debug, Serialize)]
pub struct GroupedValues {
    pub perspective_id: DbId,
    pub values: Vec<String>,
}

/// POST /v1/perspectives -- create a group and its fields transactionally.
pub async fn create_group(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePerspectiveGroup>,
) -> AppResult<(StatusCode, Json<PerspectiveGroupDetail>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Perspective name must not be blank".into()).into());
    }
    for item in &input.items {
        if PerspectiveKind::parse(&item.kind).is_none() {
            return Err(
                CoreError::Validation(format!("Unknown perspective kind: {}", item.kind)).into(),
            );
        }
    }

    let group = PerspectiveRepo::create_group(&state.pool, user.user_id, &input).await?;
    let detail = group_detail(&state, group).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /v1/perspectives -- the caller's groups with items and projects.
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<PerspectiveGroupDetail>>> {
    let groups = PerspectiveRepo::list_groups_by_creator(&state.pool, user.user_id).await?;
    let mut details = Vec::with_capacity(groups.len());
    for group in groups {
        details.push(group_detail(&state, group).await?);
    }
    Ok(Json(details))
}

/// GET /v1/perspectives/all -- every group, for project association pickers.
pub async fn list_all(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<PerspectiveGroupDetail>>> {
    let groups = PerspectiveRepo::list_groups(&state.pool).await?;
    let mut details = Vec::with_capacity(groups.len());
    for group in groups {
        details.push(group_detail(&state, group).await?);
    }
    Ok(Json(details))
}

/// DELETE /v1/perspectives/{id} -- delete a whole group (creator only).
///
/// Rejected while any project still references the group.
pub async fn delete_group(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let group = PerspectiveRepo::find_group(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "perspective project",
            id,
        })?;
    if group.created_by != Some(user.user_id) {
        return Err(
            CoreError::Forbidden("Only the creator can delete a perspective project".into())
                .into(),
        );
    }
    if PerspectiveRepo::group_reference_count(&state.pool, id).await? > 0 {
        return Err(CoreError::Conflict(
            "Perspective project is still associated with projects".into(),
        )
        .into());
    }
    PerspectiveRepo::delete_group(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/perspectives/items/{id} -- delete one field (creator only).
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let item = PerspectiveRepo::find_item(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "perspective",
            id,
        })?;
    let group = PerspectiveRepo::find_group(&state.pool, item.perspective_project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "perspective project",
            id: item.perspective_project_id,
        })?;
    if group.created_by != Some(user.user_id) {
        return Err(CoreError::Forbidden("Only the creator can delete a perspective".into()).into());
    }
    PerspectiveRepo::delete_item(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/projects/{project_id}/perspective (project admin) -- associate.
pub async fn associate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<AssociateRequest>,
) -> AppResult<Json<labelhub_db::models::project::Project>> {
    require_project_admin(&state.pool, project_id, &user).await?;
    PerspectiveRepo::find_group(&state.pool, input.perspective_project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "perspective project",
            id: input.perspective_project_id,
        })?;
    let project =
        ProjectRepo::set_perspective(&state.pool, project_id, Some(input.perspective_project_id))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "project",
                id: project_id,
            })?;
    Ok(Json(project))
}

/// DELETE /v1/projects/{project_id}/perspective (project admin) -- dissociate.
pub async fn dissociate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<labelhub_db::models::project::Project>> {
    require_project_admin(&state.pool, project_id, &user).await?;
    let project = ProjectRepo::set_perspective(&state.pool, project_id, None)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id,
        })?;
    Ok(Json(project))
}

/// GET /v1/projects/{project_id}/perspectives -- fields of the associated group.
pub async fn list_for_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Perspective>>> {
    require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    let Some(group_id) = project.perspective_project_id else {
        return Ok(Json(Vec::new()));
    };
    let items = PerspectiveRepo::list_items(&state.pool, group_id).await?;
    Ok(Json(items))
}

/// POST /v1/projects/{project_id}/perspective/values -- fill my values.
pub async fn fill_values(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<FillValuesRequest>,
) -> AppResult<Json<Vec<PerspectiveMemberValue>>> {
    let member = require_member(&state.pool, project_id, &user).await?;
    let project = find_project(&state, project_id).await?;
    if project.perspective_project_id.is_none() {
        return Err(
            CoreError::Validation("Project has no associated perspective project".into()).into(),
        );
    }

    let mut stored = Vec::with_capacity(input.values.len());
    for pair in &input.values {
        stored.push(
            PerspectiveRepo::upsert_value(&state.pool, member.id, pair.perspective_id, &pair.value)
                .await?,
        );
    }
    Ok(Json(stored))
}

/// GET /v1/projects/{project_id}/perspective/values -- my filled values.
pub async fn my_values(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<PerspectiveMemberValue>>> {
    let member = require_member(&state.pool, project_id, &user).await?;
    let values = PerspectiveRepo::values_for_member(&state.pool, member.id).await?;
    Ok(Json(values))
}

/// GET /v1/projects/{project_id}/perspective/all-values
///
/// Every filled value across the version-family, grouped by perspective.
pub async fn all_values(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<GroupedValues>>> {
    require_member(&state.pool, project_id, &user).await?;
    let family = ProjectRepo::version_family_ids(&state.pool, project_id).await?;
    let rows = PerspectiveRepo::member_values_for_projects(&state.pool, &family).await?;

    let mut grouped: BTreeMap<DbId, Vec<String>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.perspective_id).or_default().push(row.value);
    }
    let result = grouped
        .into_iter()
        .map(|(perspective_id, values)| GroupedValues {
            perspective_id,
            values,
        })
        .collect();
    Ok(Json(result))
}

/// GET /v1/projects/{project_id}/perspective/users?perspective_id=..&value=..
pub async fn users_with_value(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<UsersWithValueQuery>,
) -> AppResult<Json<Vec<String>>> {
    require_member(&state.pool, project_id, &user).await?;
    let family = ProjectRepo::version_family_ids(&state.pool, project_id).await?;
    let usernames = PerspectiveRepo::usernames_with_value(
        &state.pool,
        &family,
        query.perspective_id,
        &query.value,
    )
    .await?;
    Ok(Json(usernames))
}

async fn group_detail(
    state: &AppState,
    group: PerspectiveProject,
) -> AppResult<PerspectiveGroupDetail> {
    let items = PerspectiveRepo::list_items(&state.pool, group.id).await?;
    let projects = PerspectiveRepo::referencing_project_ids(&state.pool, group.id).await?;
    Ok(PerspectiveGroupDetail {
        group,
        items,
        projects,
    })
}
