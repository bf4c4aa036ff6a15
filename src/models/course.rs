use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{Schedule, ScheduleDraft, required_text};
use crate::error::AppError;

/// Course
///
/// A row in `courses`. `program_name` is only populated by reads that join `programs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Course {
    pub course_id: i32,
    pub course_name: String,
    pub course_description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: Schedule,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub program_name: Option<String>,
}

/// CourseRequest
///
/// Body for POST /course and PUT /course/{course_id}. A PUT replaces the whole course,
/// so both run the same checks.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CourseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_description: Option<String>,
    #[serde(flatten)]
    pub schedule: ScheduleDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub course_name: String,
    pub course_description: String,
    pub schedule: Schedule,
}

impl CourseRequest {
    pub fn validate(self) -> Result<NewCourse, AppError> {
        Ok(NewCourse {
            course_name: required_text(self.course_name, "course_name")?,
            course_description: required_text(self.course_description, "course_description")?,
            schedule: self.schedule.validate()?,
        })
    }
}
