use async_trait::async_trait;

use super::{PostgresRepository, RepoResult};
use crate::models::{ChildSchedule, Parent, ParentChild};

/// Parent role rows and the parent-centric scheduling lookups.
#[async_trait]
pub trait ParentStore: Send + Sync {
    async fn find_parent(&self, parent_id: i32) -> RepoResult<Option<Parent>>;
    async fn find_parent_by_profile(&self, profile_id: i32) -> RepoResult<Option<Parent>>;
    /// Left join parent → children. Empty only when the profile has no parent row.
    async fn parent_children(&self, profile_id: i32) -> RepoResult<Vec<ParentChild>>;
    /// Left join parent → children → enrollments → courses.
    async fn child_schedules(&self, profile_id: i32) -> RepoResult<Vec<ChildSchedule>>;
}

#[async_trait]
impl ParentStore for PostgresRepository {
    async fn find_parent(&self, parent_id: i32) -> RepoResult<Option<Parent>> {
        sqlx::query_as::<_, Parent>("SELECT parent_id, profile_id FROM parents WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_parent_by_profile(&self, profile_id: i32) -> RepoResult<Option<Parent>> {
        sqlx::query_as::<_, Parent>("SELECT parent_id, profile_id FROM parents WHERE profile_id = $1")
            .bind(profile_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn parent_children(&self, profile_id: i32) -> RepoResult<Vec<ParentChild>> {
        sqlx::query_as::<_, ParentChild>(
            r#"
            SELECT
                pa.parent_id, pa.profile_id,
                c.child_id, c.name, c.username, c.age, c.avatar_url
            FROM parents pa
            LEFT JOIN children c ON c.parent_id = pa.parent_id
            WHERE pa.profile_id = $1
            ORDER BY c.child_id
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn child_schedules(&self, profile_id: i32) -> RepoResult<Vec<ChildSchedule>> {
        sqlx::query_as::<_, ChildSchedule>(
            r#"
            SELECT
                pa.parent_id,
                c.child_id, c.name AS child_name,
                e.enrollment_id, e.completed,
                co.course_id, co.course_name, co.days_of_week,
                co.start_time, co.end_time, co.start_date, co.end_date, co.location
            FROM parents pa
            LEFT JOIN children c ON c.parent_id = pa.parent_id
            LEFT JOIN enrollments e ON e.child_id = c.child_id
            LEFT JOIN courses co ON co.course_id = e.course_id
            WHERE pa.profile_id = $1
            ORDER BY c.child_id, co.start_date, co.start_time
            "#,
        )
        .bind(profile_id)
        .fetch_all(&self.pool)
        .await
    }
}
