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
    models::{
        Child, ChildMessage, ChildRequest, EnrollRequest, EnrolledCourse, EnrollmentMessage,
        MessageResponse, UpdateEnrollmentRequest, required,
    },
    repository::{ChildStore, EnrollOutcome},
};

fn already_enrolled() -> AppError {
    AppError::bad_request("child is already enrolled")
}

fn not_enrolled(child_id: i32, course_id: i32) -> AppError {
    AppError::not_found(format!(
        "child {child_id} is not enrolled in course {course_id}"
    ))
}

#[utoipa::path(
    get,
    path = "/children",
    tag = "children",
    responses((status = 200, description = "All children", body = [Child]))
)]
pub async fn list_children(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Child>>> {
    Ok(Json(state.repo.list_children().await?))
}

#[utoipa::path(
    get,
    path = "/children/{id}",
    tag = "children",
    params(("id" = i32, Path, description = "Child id")),
    responses(
        (status = 200, description = "Found", body = Child),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_child(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Child>> {
    Ok(Json(guards::child_exists(state.repo.as_ref(), id).await?))
}

/// update_child
///
/// [Parent or Admin] Partial update of a child's details.
#[utoipa::path(
    put,
    path = "/children/{id}",
    tag = "children",
    params(("id" = i32, Path, description = "Child id")),
    request_body = ChildRequest,
    responses(
        (status = 200, description = "Updated", body = ChildMessage),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 403, description = "Not the child's parent", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_child(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<ChildRequest>,
) -> AppResult<Json<ChildMessage>> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    guards::ensure_child_guardian(repo, &user, &child).await?;
    let changes = payload.validate_update()?;

    let child = repo
        .update_child(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found(format!("child with id {id} is not found")))?;
    Ok(Json(ChildMessage {
        message: format!("Child with id {id} updated"),
        child,
    }))
}

#[utoipa::path(
    delete,
    path = "/children/{id}",
    tag = "children",
    params(("id" = i32, Path, description = "Child id")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 403, description = "Not the child's parent", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_child(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    guards::ensure_child_guardian(repo, &user, &child).await?;

    if !repo.delete_child(id).await? {
        return Err(AppError::not_found(format!("child with id {id} is not found")));
    }
    tracing::info!(child_id = id, "child deleted");
    Ok(Json(MessageResponse::new(format!(
        "Child with id {id} was deleted."
    ))))
}

#[utoipa::path(
    get,
    path = "/children/{id}/enrollments",
    tag = "children",
    params(("id" = i32, Path, description = "Child id")),
    responses(
        (status = 200, description = "Courses the child is enrolled in", body = [EnrolledCourse]),
        (status = 404, description = "Child not found", body = ErrorResponse)
    )
)]
pub async fn get_enrollments(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<EnrolledCourse>>> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    Ok(Json(repo.enrolled_courses(child.child_id).await?))
}

/// enroll_child
///
/// [Parent or Admin] Enrolls the child in a course. Rejects double enrollment, children
/// outside the course's age range, and full courses.
#[utoipa::path(
    post,
    path = "/children/{id}/enrollments",
    tag = "children",
    params(("id" = i32, Path, description = "Child id")),
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrolled", body = EnrollmentMessage),
        (status = 400, description = "Already enrolled, wrong age, or course full", body = ErrorResponse),
        (status = 403, description = "Not the child's parent", body = ErrorResponse),
        (status = 404, description = "Child or course not found", body = ErrorResponse)
    )
)]
pub async fn enroll_child(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<EnrollRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentMessage>)> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    guards::ensure_child_guardian(repo, &user, &child).await?;
    let course_id = required(payload.course_id, "course_id")?;
    let course = guards::course_exists(repo, course_id).await?;

    let enrolled = repo.enrolled_courses(child.child_id).await?;
    if enrolled.iter().any(|e| e.course.course_id == course_id) {
        return Err(already_enrolled());
    }
    if !course.schedule.admits_age(child.age) {
        return Err(AppError::bad_request(
            "child does not meet the age requirements for this course",
        ));
    }

    match repo.enroll_child(child.child_id, course_id).await? {
        EnrollOutcome::Enrolled(enrollment) => {
            tracing::info!(child_id = id, course_id, "child enrolled");
            Ok((
                StatusCode::CREATED,
                Json(EnrollmentMessage {
                    message: "Student enrolled!".to_string(),
                    enrollment,
                }),
            ))
        }
        EnrollOutcome::AlreadyEnrolled => Err(already_enrolled()),
        EnrollOutcome::CourseFull => Err(AppError::bad_request("course is full")),
        EnrollOutcome::CourseNotFound => Err(AppError::not_found(format!(
            "course with id {course_id} does not exist"
        ))),
    }
}

#[utoipa::path(
    put,
    path = "/children/{id}/enrollments/{course_id}",
    tag = "children",
    params(
        ("id" = i32, Path, description = "Child id"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    request_body = UpdateEnrollmentRequest,
    responses(
        (status = 200, description = "Updated", body = EnrollmentMessage),
        (status = 403, description = "Not the child's parent", body = ErrorResponse),
        (status = 404, description = "Child not found or not enrolled", body = ErrorResponse)
    )
)]
pub async fn update_enrollment(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, course_id)): Path<(i32, i32)>,
    ApiJson(payload): ApiJson<UpdateEnrollmentRequest>,
) -> AppResult<Json<EnrollmentMessage>> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    guards::ensure_child_guardian(repo, &user, &child).await?;
    let completed = required(payload.completed, "completed")?;

    let enrollment = repo
        .set_enrollment_completed(id, course_id, completed)
        .await?
        .ok_or_else(|| not_enrolled(id, course_id))?;
    Ok(Json(EnrollmentMessage {
        message: "Enrollment updated".to_string(),
        enrollment,
    }))
}

#[utoipa::path(
    delete,
    path = "/children/{id}/enrollments/{course_id}",
    tag = "children",
    params(
        ("id" = i32, Path, description = "Child id"),
        ("course_id" = i32, Path, description = "Course id")
    ),
    responses(
        (status = 200, description = "Unenrolled", body = MessageResponse),
        (status = 403, description = "Not the child's parent", body = ErrorResponse),
        (status = 404, description = "Child not found or not enrolled", body = ErrorResponse)
    )
)]
pub async fn unenroll_child(
    user: AuthUser,
    State(state): State<AppState>,
    Path((id, course_id)): Path<(i32, i32)>,
) -> AppResult<Json<MessageResponse>> {
    let repo = state.repo.as_ref();
    let child = guards::child_exists(repo, id).await?;
    guards::ensure_child_guardian(repo, &user, &child).await?;

    if !repo.unenroll_child(id, course_id).await? {
        return Err(not_enrolled(id, course_id));
    }
    Ok(Json(MessageResponse::new(format!(
        "Child {id} unenrolled from course {course_id}"
    ))))
}
