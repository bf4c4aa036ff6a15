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
    models::{Course, CourseCreated, CourseRequest, CourseUpdated, MessageResponse, Role},
    repository::CourseStore,
};

fn course_not_found(course_id: i32) -> AppError {
    AppError::not_found(format!("course with id {course_id} does not exist"))
}

#[utoipa::path(
    get,
    path = "/course",
    tag = "courses",
    responses((status = 200, description = "All courses", body = [Course]))
)]
pub async fn list_courses(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Course>>> {
    Ok(Json(state.repo.list_courses().await?))
}

#[utoipa::path(
    get,
    path = "/course/{course_id}",
    tag = "courses",
    params(("course_id" = i32, Path, description = "Course id")),
    responses(
        (status = 200, description = "Found", body = Course),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_course(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> AppResult<Json<Course>> {
    Ok(Json(guards::course_exists(state.repo.as_ref(), course_id).await?))
}

/// create_course
///
/// [Instructor or Admin] Adds a course. Instructors may only create courses they teach.
#[utoipa::path(
    post,
    path = "/course",
    tag = "courses",
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Created", body = CourseCreated),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Not an instructor", body = ErrorResponse),
        (status = 404, description = "Instructor or program not found", body = ErrorResponse)
    )
)]
pub async fn create_course(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CourseRequest>,
) -> AppResult<Json<CourseCreated>> {
    let repo = state.repo.as_ref();
    guards::require_role(&user, &[Role::Instructor])?;
    let new_course = payload.validate()?;
    guards::schedule_references(repo, &user, &new_course.schedule).await?;

    let created_course = repo.create_course(new_course).await?;
    tracing::info!(course_id = created_course.course_id, "course created");
    Ok(Json(CourseCreated {
        message: "New course added.".to_string(),
        created_course,
    }))
}

/// update_course
///
/// [Owner or Admin] Replaces every field of the course.
#[utoipa::path(
    put,
    path = "/course/{course_id}",
    tag = "courses",
    params(("course_id" = i32, Path, description = "Course id")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Updated", body = CourseUpdated),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Not the course's instructor", body = ErrorResponse),
        (status = 404, description = "Course, instructor or program not found", body = ErrorResponse)
    )
)]
pub async fn update_course(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    ApiJson(payload): ApiJson<CourseRequest>,
) -> AppResult<Json<CourseUpdated>> {
    let repo = state.repo.as_ref();
    let current = guards::course_exists(repo, course_id).await?;
    guards::ensure_instructor_owner(repo, &user, current.schedule.instructor_id).await?;
    let changes = payload.validate()?;
    guards::schedule_references(repo, &user, &changes.schedule).await?;

    let course = repo
        .update_course(course_id, changes)
        .await?
        .ok_or_else(|| course_not_found(course_id))?;
    Ok(Json(CourseUpdated {
        message: format!("Course with the course_id: {course_id} updated"),
        course,
    }))
}

#[utoipa::path(
    delete,
    path = "/course/{course_id}",
    tag = "courses",
    params(("course_id" = i32, Path, description = "Course id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not the course's instructor", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_course(
    user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let repo = state.repo.as_ref();
    let current = guards::course_exists(repo, course_id).await?;
    guards::ensure_instructor_owner(repo, &user, current.schedule.instructor_id).await?;

    if !repo.delete_course(course_id).await? {
        return Err(course_not_found(course_id));
    }
    tracing::info!(course_id, "course deleted");
    Ok(Json(MessageResponse::new(format!(
        "Course with id:'{course_id}' was deleted."
    ))))
}
