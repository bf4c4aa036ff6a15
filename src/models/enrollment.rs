use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::Course;

/// Enrollment
///
/// Join row linking a child to a course. `(child_id, course_id)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Enrollment {
    pub enrollment_id: i32,
    pub child_id: i32,
    pub course_id: i32,
    pub completed: bool,
}

/// EnrolledCourse
///
/// A course as seen from a child's enrollment list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct EnrolledCourse {
    pub enrollment_id: i32,
    pub completed: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub course: Course,
}

/// Body for POST /children/{id}/enrollments.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct EnrollRequest {
    pub course_id: Option<i32>,
}

/// Body for PUT /children/{id}/enrollments/{course_id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateEnrollmentRequest {
    pub completed: Option<bool>,
}
