use async_trait::async_trait;

use super::{PostgresRepository, RepoResult, SCHEDULE_COLUMNS, bind_schedule};
use crate::models::{ClassInstance, NewClassInstance};

#[async_trait]
pub trait ClassInstanceStore: Send + Sync {
    async fn list_class_instances(&self) -> RepoResult<Vec<ClassInstance>>;
    async fn find_class_instance(&self, class_id: i32) -> RepoResult<Option<ClassInstance>>;
    async fn create_class_instance(&self, class: NewClassInstance) -> RepoResult<ClassInstance>;
    async fn update_class_instance(
        &self,
        class_id: i32,
        class: NewClassInstance,
    ) -> RepoResult<Option<ClassInstance>>;
    async fn delete_class_instance(&self, class_id: i32) -> RepoResult<bool>;
}

const SELECT_CLASS: &str = r#"
    SELECT ci.*, p.program_name
    FROM class_instances ci
    JOIN programs p ON p.program_id = ci.program_id
"#;

#[async_trait]
impl ClassInstanceStore for PostgresRepository {
    async fn list_class_instances(&self) -> RepoResult<Vec<ClassInstance>> {
        sqlx::query_as::<_, ClassInstance>(&format!(
            "{SELECT_CLASS} ORDER BY ci.start_date, ci.start_time, ci.class_id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_class_instance(&self, class_id: i32) -> RepoResult<Option<ClassInstance>> {
        sqlx::query_as::<_, ClassInstance>(&format!("{SELECT_CLASS} WHERE ci.class_id = $1"))
            .bind(class_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_class_instance(&self, class: NewClassInstance) -> RepoResult<ClassInstance> {
        let sql = format!(
            r#"
            WITH ci AS (
                INSERT INTO class_instances (class_name, class_description, {SCHEDULE_COLUMNS})
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                RETURNING *
            )
            SELECT ci.*, p.program_name FROM ci JOIN programs p ON p.program_id = ci.program_id
            "#
        );
        let query = sqlx::query_as::<_, ClassInstance>(&sql)
            .bind(&class.class_name)
            .bind(&class.class_description);
        bind_schedule(query, &class.schedule)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_class_instance(
        &self,
        class_id: i32,
        class: NewClassInstance,
    ) -> RepoResult<Option<ClassInstance>> {
        let sql = format!(
            r#"
            WITH ci AS (
                UPDATE class_instances
                SET (class_name, class_description, {SCHEDULE_COLUMNS}) =
                    ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                WHERE class_id = $1
                RETURNING *
            )
            SELECT ci.*, p.program_name FROM ci JOIN programs p ON p.program_id = ci.program_id
            "#
        );
        let query = sqlx::query_as::<_, ClassInstance>(&sql)
            .bind(class_id)
            .bind(&class.class_name)
            .bind(&class.class_description);
        bind_schedule(query, &class.schedule)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_class_instance(&self, class_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM class_instances WHERE class_id = $1")
            .bind(class_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
