use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

/// Parent
///
/// Role row for a parent profile; children reference `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Parent {
    pub parent_id: i32,
    pub profile_id: i32,
}

/// Instructor
///
/// Role row for an instructor profile; courses and class instances reference
/// `instructor_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Instructor {
    pub instructor_id: i32,
    pub profile_id: i32,
    pub rating: i32,
    pub bio: String,
}

/// ParentChild
///
/// One row of the parent → children left join. A parent without children yields a
/// single row whose child columns are all null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ParentChild {
    pub parent_id: i32,
    pub profile_id: i32,
    pub child_id: Option<i32>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub avatar_url: Option<String>,
}

/// ChildSchedule
///
/// One row of the parent → children → enrollments → courses left join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ChildSchedule {
    pub parent_id: i32,
    pub child_id: Option<i32>,
    pub child_name: Option<String>,
    pub enrollment_id: Option<i32>,
    pub completed: Option<bool>,
    pub course_id: Option<i32>,
    pub course_name: Option<String>,
    pub days_of_week: Option<Vec<String>>,
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: Option<String>,
}
