use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult, ErrorResponse},
    extract::ApiJson,
    guards,
    models::{
        ClassInstance, ClassInstanceCreated, ClassInstanceRequest, ClassInstanceUpdated,
        MessageResponse, Role,
    },
    repository::ClassInstanceStore,
};

fn class_not_found(class_id: i32) -> AppError {
    AppError::not_found(format!("class instance with id {class_id} does not exist"))
}

#[utoipa::path(
    get,
    path = "/class-instance",
    tag = "class_instances",
    responses((status = 200, description = "All class instances", body = [ClassInstance]))
)]
pub async fn list_class_instances(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClassInstance>>> {
    Ok(Json(state.repo.list_class_instances().await?))
}

#[utoipa::path(
    get,
    path = "/class-instance/{class_id}",
    tag = "class_instances",
    params(("class_id" = i32, Path, description = "Class instance id")),
    responses(
        (status = 200, description = "Found", body = ClassInstance),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_class_instance(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
) -> AppResult<Json<ClassInstance>> {
    Ok(Json(
        guards::class_instance_exists(state.repo.as_ref(), class_id).await?,
    ))
}

/// create_class_instance
///
/// [Instructor or Admin] Schedules a new class instance.
#[utoipa::path(
    post,
    path = "/class-instance",
    tag = "class_instances",
    request_body = ClassInstanceRequest,
    responses(
        (status = 200, description = "Created", body = ClassInstanceCreated),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Not an instructor", body = ErrorResponse),
        (status = 404, description = "Instructor or program not found", body = ErrorResponse)
    )
)]
pub async fn create_class_instance(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ClassInstanceRequest>,
) -> AppResult<Json<ClassInstanceCreated>> {
    let repo = state.repo.as_ref();
    guards::require_role(&user, &[Role::Instructor])?;
    let new_class = payload.validate()?;
    guards::schedule_references(repo, &user, &new_class.schedule).await?;

    let schedule = repo.create_class_instance(new_class).await?;
    tracing::info!(class_id = schedule.class_id, "class instance created");
    Ok(Json(ClassInstanceCreated {
        message: "New Class Instance Added.".to_string(),
        schedule,
    }))
}

/// update_class_instance
///
/// [Owner or Admin] Partial update. Omitted fields keep their stored values and the
/// merged row must still pass every schedule rule.
#[utoipa::path(
    put,
    path = "/class-instance/{class_id}",
    tag = "class_instances",
    params(("class_id" = i32, Path, description = "Class instance id")),
    request_body = ClassInstanceRequest,
    responses(
        (status = 200, description = "Updated", body = ClassInstanceUpdated),
        (status = 400, description = "Merged row is invalid", body = ErrorResponse),
        (status = 403, description = "Not the class's instructor", body = ErrorResponse),
        (status = 404, description = "Class instance, instructor or program not found", body = ErrorResponse)
    )
)]
pub async fn update_class_instance(
    user: AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
    ApiJson(payload): ApiJson<ClassInstanceRequest>,
) -> AppResult<Json<ClassInstanceUpdated>> {
    let repo = state.repo.as_ref();
    let current = guards::class_instance_exists(repo, class_id).await?;
    guards::ensure_instructor_owner(repo, &user, current.schedule.instructor_id).await?;
    let merged = payload.apply_to(current)?;
    guards::schedule_references(repo, &user, &merged.schedule).await?;

    let class_instance = repo
        .update_class_instance(class_id, merged)
        .await?
        .ok_or_else(|| class_not_found(class_id))?;
    Ok(Json(ClassInstanceUpdated {
        message: format!("Class instance with the class_id: {class_id} updated"),
        class_instance,
    }))
}

#[utoipa::path(
    delete,
    path = "/class-instance/{class_id}",
    tag = "class_instances",
    params(("class_id" = i32, Path, description = "Class instance id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not the class's instructor", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_class_instance(
    user: AuthUser,
    State(state): State<AppState>,
    Path(class_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let repo = state.repo.as_ref();
    let current = guards::class_instance_exists(repo, class_id).await?;
    guards::ensure_instructor_owner(repo, &user, current.schedule.instructor_id).await?;

    if !repo.delete_class_instance(class_id).await? {
        return Err(class_not_found(class_id));
    }
    tracing::info!(class_id, "class instance deleted");
    Ok(Json(MessageResponse::new(format!(
        "Schedule with id:'{class_id}' was deleted."
    ))))
}
