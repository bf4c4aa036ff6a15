use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult, ErrorResponse},
    extract::ApiJson,
    guards,
    models::{ChildMessage, ChildRequest, ChildSchedule, ParentChild, Role},
    repository::{ChildStore, ParentStore},
};

/// get_parent_children
///
/// Children of the parent owning `profile_id`. A parent with no children yields one row
/// with null child columns; a profile that is not a parent yields 404.
#[utoipa::path(
    get,
    path = "/parent/{profile_id}/children",
    tag = "parents",
    params(("profile_id" = i32, Path, description = "Parent's profile id")),
    responses(
        (status = 200, description = "Parent/child rows", body = [ParentChild]),
        (status = 404, description = "No parent for this profile", body = ErrorResponse)
    )
)]
pub async fn get_parent_children(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(profile_id): Path<i32>,
) -> AppResult<Json<Vec<ParentChild>>> {
    let children = state.repo.parent_children(profile_id).await?;
    if children.is_empty() {
        return Err(AppError::not_found("ParentChildrenNotFound"));
    }
    Ok(Json(children))
}

/// get_child_schedules
///
/// Every enrollment of every child of the parent owning `profile_id`, with the course's
/// schedule.
#[utoipa::path(
    get,
    path = "/parent/{profile_id}/schedules",
    tag = "parents",
    params(("profile_id" = i32, Path, description = "Parent's profile id")),
    responses(
        (status = 200, description = "Schedule rows", body = [ChildSchedule]),
        (status = 404, description = "No parent for this profile", body = ErrorResponse)
    )
)]
pub async fn get_child_schedules(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(profile_id): Path<i32>,
) -> AppResult<Json<Vec<ChildSchedule>>> {
    let schedules = state.repo.child_schedules(profile_id).await?;
    if schedules.is_empty() {
        return Err(AppError::not_found("ChildSchedulesNotFound"));
    }
    Ok(Json(schedules))
}

/// add_child
///
/// [Parent or Admin] Adds a child under `parent_id`. Parents may only add to their own
/// record.
#[utoipa::path(
    post,
    path = "/parent/{parent_id}/children",
    tag = "parents",
    params(("parent_id" = i32, Path, description = "Parent id")),
    request_body = ChildRequest,
    responses(
        (status = 201, description = "Child added", body = ChildMessage),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Not a parent, or not this parent", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    )
)]
pub async fn add_child(
    user: AuthUser,
    State(state): State<AppState>,
    Path(parent_id): Path<i32>,
    ApiJson(payload): ApiJson<ChildRequest>,
) -> AppResult<(StatusCode, Json<ChildMessage>)> {
    let repo = state.repo.as_ref();
    guards::require_role(&user, &[Role::Parent])?;
    let parent = guards::parent_exists(repo, parent_id).await?;
    guards::ensure_parent_owner(&user, &parent)?;
    let new_child = payload.validate_new()?;

    let child = repo.add_child(parent.parent_id, new_child).await?;
    tracing::info!(child_id = child.child_id, parent_id, "child added");
    Ok((
        StatusCode::CREATED,
        Json(ChildMessage {
            message: "Child successfully added!".to_string(),
            child,
        }),
    ))
}
