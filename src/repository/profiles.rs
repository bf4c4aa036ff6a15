use async_trait::async_trait;
use sqlx::PgConnection;

use super::{PostgresRepository, RepoResult};
use crate::models::{Instructor, NewProfile, Profile, ProfileWithRole, Role, UpdateProfileRequest};

/// Profiles, plus the instructor role rows they own.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn list_profiles(&self) -> RepoResult<Vec<Profile>>;
    async fn find_profile_by_okta_id(&self, okta_id: &str) -> RepoResult<Option<Profile>>;
    /// Profiles of one role, each joined with its role-specific row id.
    async fn find_profiles_by_role(&self, role: Role) -> RepoResult<Vec<ProfileWithRole>>;
    /// Inserts the profile and, for instructors and parents, the matching role row.
    async fn create_profile(&self, profile: NewProfile) -> RepoResult<Profile>;
    /// Returns the profile for `okta_id`, creating a parent profile on first sight.
    async fn find_or_create_profile(
        &self,
        okta_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> RepoResult<Profile>;
    /// Partial update; absent fields keep their value. `None` if no such profile.
    async fn update_profile(
        &self,
        okta_id: &str,
        changes: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>>;
    /// Deletes and returns the profile. Role rows cascade.
    async fn delete_profile(&self, okta_id: &str) -> RepoResult<Option<Profile>>;

    async fn find_instructor(&self, instructor_id: i32) -> RepoResult<Option<Instructor>>;
    async fn find_instructor_by_profile(&self, profile_id: i32) -> RepoResult<Option<Instructor>>;
}

const PROFILE_COLUMNS: &str = "profile_id, okta_id, role_id, name, email, avatar_url, created_at";

async fn insert_role_row(conn: &mut PgConnection, role: Role, profile_id: i32) -> RepoResult<()> {
    let sql = match role {
        Role::Instructor => {
            "INSERT INTO instructors (profile_id) VALUES ($1) ON CONFLICT (profile_id) DO NOTHING"
        }
        Role::Parent => {
            "INSERT INTO parents (profile_id) VALUES ($1) ON CONFLICT (profile_id) DO NOTHING"
        }
        _ => return Ok(()),
    };
    sqlx::query(sql).bind(profile_id).execute(&mut *conn).await?;
    Ok(())
}

#[async_trait]
impl ProfileStore for PostgresRepository {
    async fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY profile_id"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_profile_by_okta_id(&self, okta_id: &str) -> RepoResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE okta_id = $1"
        ))
        .bind(okta_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_profiles_by_role(&self, role: Role) -> RepoResult<Vec<ProfileWithRole>> {
        sqlx::query_as::<_, ProfileWithRole>(
            r#"
            SELECT
                p.profile_id, p.okta_id, p.role_id, p.name, p.email, p.avatar_url, p.created_at,
                i.instructor_id, pa.parent_id, c.child_id
            FROM profiles p
            LEFT JOIN instructors i ON i.profile_id = p.profile_id
            LEFT JOIN parents pa ON pa.profile_id = p.profile_id
            LEFT JOIN children c ON c.profile_id = p.profile_id
            WHERE p.role_id = $1
            ORDER BY p.profile_id
            "#,
        )
        .bind(role.id())
        .fetch_all(&self.pool)
        .await
    }

    async fn create_profile(&self, profile: NewProfile) -> RepoResult<Profile> {
        let mut tx = self.pool.begin().await?;
        let created = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (okta_id, role_id, name, email, avatar_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(&profile.okta_id)
        .bind(profile.role.id())
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .fetch_one(&mut *tx)
        .await?;
        insert_role_row(&mut tx, profile.role, created.profile_id).await?;
        tx.commit().await?;
        Ok(created)
    }

    async fn find_or_create_profile(
        &self,
        okta_id: &str,
        name: &str,
        email: Option<&str>,
    ) -> RepoResult<Profile> {
        if let Some(existing) = self.find_profile_by_okta_id(okta_id).await? {
            return Ok(existing);
        }

        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (okta_id, role_id, name, email) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (okta_id) DO NOTHING RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(okta_id)
        .bind(Role::Parent.id())
        .bind(name)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        match inserted {
            Some(profile) => {
                insert_role_row(&mut tx, Role::Parent, profile.profile_id).await?;
                tx.commit().await?;
                tracing::info!(okta_id, profile_id = profile.profile_id, "created profile on first login");
                Ok(profile)
            }
            // Lost a race with a concurrent first login.
            None => {
                tx.rollback().await?;
                self.find_profile_by_okta_id(okta_id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    async fn update_profile(
        &self,
        okta_id: &str,
        changes: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>> {
        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url),
                role_id = COALESCE($5, role_id)
            WHERE okta_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(okta_id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.avatar_url)
        .bind(changes.role_id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(profile) = &updated {
            insert_role_row(&mut tx, profile.role(), profile.profile_id).await?;
        }
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_profile(&self, okta_id: &str) -> RepoResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "DELETE FROM profiles WHERE okta_id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(okta_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_instructor(&self, instructor_id: i32) -> RepoResult<Option<Instructor>> {
        sqlx::query_as::<_, Instructor>(
            "SELECT instructor_id, profile_id, rating, bio FROM instructors WHERE instructor_id = $1",
        )
        .bind(instructor_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_instructor_by_profile(&self, profile_id: i32) -> RepoResult<Option<Instructor>> {
        sqlx::query_as::<_, Instructor>(
            "SELECT instructor_id, profile_id, rating, bio FROM instructors WHERE profile_id = $1",
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
    }
}
