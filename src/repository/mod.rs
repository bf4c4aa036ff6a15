//! Data access. One store trait per resource, all implemented by `PostgresRepository`
//! and collected by the `Repository` supertrait so handlers share a single
//! `Arc<dyn Repository>`.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, postgres::PgArguments, query::QueryAs};

use crate::models::Schedule;

mod children;
mod class_instances;
mod courses;
mod parents;
mod profiles;

pub use children::{ChildStore, EnrollOutcome};
pub use class_instances::ClassInstanceStore;
pub use courses::CourseStore;
pub use parents::ParentStore;
pub use profiles::ProfileStore;

pub type RepoResult<T> = Result<T, sqlx::Error>;

/// Repository
///
/// Everything the handlers need from persistence. Implemented automatically for any
/// type implementing all of the per-resource stores, which lets tests swap in an
/// in-memory implementation.
pub trait Repository:
    ProfileStore + ParentStore + ChildStore + CourseStore + ClassInstanceStore + Send + Sync
{
}

impl<T> Repository for T where
    T: ProfileStore + ParentStore + ChildStore + CourseStore + ClassInstanceStore + Send + Sync
{
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation of every store, backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// Column list shared by courses and class instances, in `bind_schedule` order.
pub(crate) const SCHEDULE_COLUMNS: &str = "days_of_week, max_size, min_age, max_age, \
     instructor_id, program_id, start_time, end_time, start_date, end_date, location, \
     number_of_sessions";

type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

/// Binds the twelve schedule columns in `SCHEDULE_COLUMNS` order.
pub(crate) fn bind_schedule<'q, O>(query: PgQueryAs<'q, O>, s: &Schedule) -> PgQueryAs<'q, O> {
    query
        .bind(s.days_of_week.clone())
        .bind(s.max_size)
        .bind(s.min_age)
        .bind(s.max_age)
        .bind(s.instructor_id)
        .bind(s.program_id)
        .bind(s.start_time)
        .bind(s.end_time)
        .bind(s.start_date)
        .bind(s.end_date)
        .bind(s.location.clone())
        .bind(s.number_of_sessions)
}
