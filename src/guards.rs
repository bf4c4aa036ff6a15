//! Request guards shared by the resource handlers.
//!
//! Each guard is one independent check that either returns what it loaded or
//! short-circuits with the `AppError` the client sees. Handlers call them in a fixed
//! order: existence, then ownership or role, then body shape.

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{ClassInstance, Child, Course, Instructor, Parent, Profile, Role, Schedule},
    repository::{
        ChildStore, ClassInstanceStore, CourseStore, ParentStore, ProfileStore, Repository,
    },
};

// --- Role authentication ---

/// Passes admins and any role listed in `allowed`.
pub fn require_role(user: &AuthUser, allowed: &[Role]) -> AppResult<()> {
    if user.role.is_admin() || allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "role {} is not permitted to perform this action",
            user.role
        )))
    }
}

pub fn require_admin(user: &AuthUser) -> AppResult<()> {
    require_role(user, &[])
}

// --- Existence ---

pub async fn child_exists(repo: &dyn Repository, child_id: i32) -> AppResult<Child> {
    repo.find_child(child_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("child with id {child_id} is not found")))
}

pub async fn course_exists(repo: &dyn Repository, course_id: i32) -> AppResult<Course> {
    repo.find_course(course_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("course with id {course_id} does not exist")))
}

pub async fn class_instance_exists(
    repo: &dyn Repository,
    class_id: i32,
) -> AppResult<ClassInstance> {
    repo.find_class_instance(class_id).await?.ok_or_else(|| {
        AppError::not_found(format!("class instance with id {class_id} does not exist"))
    })
}

pub async fn parent_exists(repo: &dyn Repository, parent_id: i32) -> AppResult<Parent> {
    repo.find_parent(parent_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("parent with id {parent_id} is not found")))
}

pub async fn instructor_exists(repo: &dyn Repository, instructor_id: i32) -> AppResult<Instructor> {
    repo.find_instructor(instructor_id).await?.ok_or_else(|| {
        AppError::not_found(format!("instructor with id {instructor_id} does not exist"))
    })
}

pub async fn program_exists(repo: &dyn Repository, program_id: i32) -> AppResult<()> {
    if repo.program_exists(program_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found(format!(
            "program with id {program_id} does not exist"
        )))
    }
}

pub async fn profile_exists(repo: &dyn Repository, okta_id: &str) -> AppResult<Profile> {
    repo.find_profile_by_okta_id(okta_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("profile with okta id {okta_id} is not found")))
}

// --- Owner authorization ---

/// The caller must be the instructor identified by `instructor_id`.
pub async fn ensure_instructor_owner(
    repo: &dyn Repository,
    user: &AuthUser,
    instructor_id: i32,
) -> AppResult<()> {
    if user.role.is_admin() {
        return Ok(());
    }
    let own = repo.find_instructor_by_profile(user.profile_id).await?;
    match own {
        Some(instructor) if instructor.instructor_id == instructor_id => Ok(()),
        _ => Err(AppError::forbidden("only the owning instructor may modify this resource")),
    }
}

/// The caller must be the parent the child belongs to.
pub async fn ensure_child_guardian(
    repo: &dyn Repository,
    user: &AuthUser,
    child: &Child,
) -> AppResult<()> {
    if user.role.is_admin() {
        return Ok(());
    }
    let own = repo.find_parent_by_profile(user.profile_id).await?;
    match own {
        Some(parent) if parent.parent_id == child.parent_id => Ok(()),
        _ => Err(AppError::forbidden("only the child's parent may modify this child")),
    }
}

/// Checks the references a course or class instance body carries: the instructor and
/// program must exist, and a non-admin may only schedule under their own instructor id.
pub async fn schedule_references(
    repo: &dyn Repository,
    user: &AuthUser,
    schedule: &Schedule,
) -> AppResult<()> {
    instructor_exists(repo, schedule.instructor_id).await?;
    ensure_instructor_owner(repo, user, schedule.instructor_id).await?;
    program_exists(repo, schedule.program_id).await
}

pub fn ensure_parent_owner(user: &AuthUser, parent: &Parent) -> AppResult<()> {
    if user.role.is_admin() || parent.profile_id == user.profile_id {
        Ok(())
    } else {
        Err(AppError::forbidden("only the parent may add children to this record"))
    }
}

pub fn ensure_profile_owner(user: &AuthUser, okta_id: &str) -> AppResult<()> {
    if user.role.is_admin() || user.okta_id == okta_id {
        Ok(())
    } else {
        Err(AppError::forbidden("only the profile owner may modify this profile"))
    }
}
