use async_trait::async_trait;

use super::{PostgresRepository, RepoResult};
use crate::models::{Child, ChildUpdate, EnrolledCourse, Enrollment, NewChild};

/// EnrollOutcome
///
/// Result of the transactional enroll. The handler checks the same conditions up front
/// for clear messages; this is the authoritative answer under concurrency.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrollOutcome {
    Enrolled(Enrollment),
    AlreadyEnrolled,
    CourseFull,
    CourseNotFound,
}

#[async_trait]
pub trait ChildStore: Send + Sync {
    async fn list_children(&self) -> RepoResult<Vec<Child>>;
    async fn find_child(&self, child_id: i32) -> RepoResult<Option<Child>>;
    async fn add_child(&self, parent_id: i32, child: NewChild) -> RepoResult<Child>;
    async fn update_child(&self, child_id: i32, changes: ChildUpdate) -> RepoResult<Option<Child>>;
    async fn delete_child(&self, child_id: i32) -> RepoResult<bool>;

    async fn enrolled_courses(&self, child_id: i32) -> RepoResult<Vec<EnrolledCourse>>;
    /// Locks the course row, re-checks duplicate and capacity, then inserts.
    async fn enroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<EnrollOutcome>;
    async fn set_enrollment_completed(
        &self,
        child_id: i32,
        course_id: i32,
        completed: bool,
    ) -> RepoResult<Option<Enrollment>>;
    async fn unenroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<bool>;
}

const CHILD_COLUMNS: &str = "child_id, profile_id, parent_id, name, username, age, avatar_url";

#[async_trait]
impl ChildStore for PostgresRepository {
    async fn list_children(&self) -> RepoResult<Vec<Child>> {
        sqlx::query_as::<_, Child>(&format!("SELECT {CHILD_COLUMNS} FROM children ORDER BY child_id"))
            .fetch_all(&self.pool)
            .await
    }

    async fn find_child(&self, child_id: i32) -> RepoResult<Option<Child>> {
        sqlx::query_as::<_, Child>(&format!(
            "SELECT {CHILD_COLUMNS} FROM children WHERE child_id = $1"
        ))
        .bind(child_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn add_child(&self, parent_id: i32, child: NewChild) -> RepoResult<Child> {
        sqlx::query_as::<_, Child>(&format!(
            "INSERT INTO children (parent_id, name, username, age, avatar_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CHILD_COLUMNS}"
        ))
        .bind(parent_id)
        .bind(child.name)
        .bind(child.username)
        .bind(child.age)
        .bind(child.avatar_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_child(&self, child_id: i32, changes: ChildUpdate) -> RepoResult<Option<Child>> {
        sqlx::query_as::<_, Child>(&format!(
            r#"
            UPDATE children
            SET name = COALESCE($2, name),
                username = COALESCE($3, username),
                age = COALESCE($4, age),
                avatar_url = CASE WHEN $5 THEN $6 ELSE avatar_url END
            WHERE child_id = $1
            RETURNING {CHILD_COLUMNS}
            "#
        ))
        .bind(child_id)
        .bind(changes.name)
        .bind(changes.username)
        .bind(changes.age)
        .bind(changes.avatar_url.is_some())
        .bind(changes.avatar_url.flatten())
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_child(&self, child_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM children WHERE child_id = $1")
            .bind(child_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn enrolled_courses(&self, child_id: i32) -> RepoResult<Vec<EnrolledCourse>> {
        sqlx::query_as::<_, EnrolledCourse>(
            r#"
            SELECT e.enrollment_id, e.completed, c.*, p.program_name
            FROM enrollments e
            JOIN courses c ON c.course_id = e.course_id
            JOIN programs p ON p.program_id = c.program_id
            WHERE e.child_id = $1
            ORDER BY c.start_date, c.start_time
            "#,
        )
        .bind(child_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn enroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<EnrollOutcome> {
        let mut tx = self.pool.begin().await?;

        let max_size = sqlx::query_scalar::<_, i32>(
            "SELECT max_size FROM courses WHERE course_id = $1 FOR UPDATE",
        )
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(max_size) = max_size else {
            return Ok(EnrollOutcome::CourseNotFound);
        };

        let already = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM enrollments WHERE child_id = $1 AND course_id = $2)",
        )
        .bind(child_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;
        if already {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let enrolled = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM enrollments WHERE course_id = $1",
        )
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;
        if enrolled >= i64::from(max_size) {
            return Ok(EnrollOutcome::CourseFull);
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (child_id, course_id) VALUES ($1, $2) \
             RETURNING enrollment_id, child_id, course_id, completed",
        )
        .bind(child_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(EnrollOutcome::Enrolled(enrollment))
    }

    async fn set_enrollment_completed(
        &self,
        child_id: i32,
        course_id: i32,
        completed: bool,
    ) -> RepoResult<Option<Enrollment>> {
        sqlx::query_as::<_, Enrollment>(
            "UPDATE enrollments SET completed = $3 WHERE child_id = $1 AND course_id = $2 \
             RETURNING enrollment_id, child_id, course_id, completed",
        )
        .bind(child_id)
        .bind(course_id)
        .bind(completed)
        .fetch_optional(&self.pool)
        .await
    }

    async fn unenroll_child(&self, child_id: i32, course_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM enrollments WHERE child_id = $1 AND course_id = $2")
            .bind(child_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
