use async_trait::async_trait;

use super::{PostgresRepository, RepoResult, SCHEDULE_COLUMNS, bind_schedule};
use crate::models::{Course, NewCourse};

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> RepoResult<Vec<Course>>;
    async fn find_course(&self, course_id: i32) -> RepoResult<Option<Course>>;
    async fn create_course(&self, course: NewCourse) -> RepoResult<Course>;
    /// Full replacement. `None` if the course does not exist.
    async fn update_course(&self, course_id: i32, course: NewCourse) -> RepoResult<Option<Course>>;
    async fn delete_course(&self, course_id: i32) -> RepoResult<bool>;
    async fn program_exists(&self, program_id: i32) -> RepoResult<bool>;
}

// Every read joins `programs` so `program_name` is populated.
const SELECT_COURSE: &str = r#"
    SELECT c.*, p.program_name
    FROM courses c
    JOIN programs p ON p.program_id = c.program_id
"#;

#[async_trait]
impl CourseStore for PostgresRepository {
    async fn list_courses(&self) -> RepoResult<Vec<Course>> {
        sqlx::query_as::<_, Course>(&format!("{SELECT_COURSE} ORDER BY c.course_id"))
            .fetch_all(&self.pool)
            .await
    }

    async fn find_course(&self, course_id: i32) -> RepoResult<Option<Course>> {
        sqlx::query_as::<_, Course>(&format!("{SELECT_COURSE} WHERE c.course_id = $1"))
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_course(&self, course: NewCourse) -> RepoResult<Course> {
        let sql = format!(
            r#"
            WITH c AS (
                INSERT INTO courses (course_name, course_description, {SCHEDULE_COLUMNS})
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
            )
            SELECT c.*, p.program_name FROM c JOIN programs p ON p.program_id = c.program_id
            "#
        );
        let query = sqlx::query_as::<_, Course>(&sql)
            .bind(&course.course_name)
            .bind(&course.course_description);
        bind_schedule(query, &course.schedule)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_course(&self, course_id: i32, course: NewCourse) -> RepoResult<Option<Course>> {
        let sql = format!(
            r#"
            WITH c AS (
                UPDATE courses
                SET (course_name, course_description, {SCHEDULE_COLUMNS}) =
                    ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                WHERE course_id = $1
                RETURNING *
            )
            SELECT c.*, p.program_name FROM c JOIN programs p ON p.program_id = c.program_id
            "#
        );
        let query = sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .bind(&course.course_name)
            .bind(&course.course_description);
        bind_schedule(query, &course.schedule)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_course(&self, course_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn program_exists(&self, program_id: i32) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM programs WHERE program_id = $1)")
            .bind(program_id)
            .fetch_one(&self.pool)
            .await
    }
}
