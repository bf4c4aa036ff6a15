//! Wire and row types for every resource, plus the body-shape checks that turn loosely
//! typed request payloads into validated inputs.

pub mod child;
pub mod class_instance;
pub mod course;
pub mod enrollment;
pub mod parent;
pub mod profile;
pub mod responses;
pub mod role;
pub mod schedule;

pub use child::{Child, ChildRequest, ChildUpdate, NewChild};
pub use class_instance::{ClassInstance, ClassInstanceRequest, NewClassInstance};
pub use course::{Course, CourseRequest, NewCourse};
pub use enrollment::{EnrollRequest, EnrolledCourse, Enrollment, UpdateEnrollmentRequest};
pub use parent::{ChildSchedule, Instructor, Parent, ParentChild};
pub use profile::{NewProfile, NewProfileRequest, Profile, ProfileWithRole, UpdateProfileRequest};
pub use responses::{
    ChildMessage, ClassInstanceCreated, ClassInstanceUpdated, CourseCreated, CourseUpdated,
    EnrollmentMessage, MessageResponse, ProfileMessage,
};
pub use role::Role;
pub use schedule::{Schedule, ScheduleDraft};

use crate::error::AppError;

/// Unwraps a required, non-blank text field.
pub(crate) fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

/// Unwraps a required field of any other type.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::bad_request(format!("{field} is required")))
}

/// Optional text that, when present, must not be blank.
pub(crate) fn non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AppError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::bad_request(format!("{field} must not be blank")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

/// Avatar URLs longer than the column allows, or blank ones, are dropped rather than
/// rejected.
pub(crate) fn normalize_avatar(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v.chars().count() <= 255)
}
