use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{required, required_text};
use crate::error::AppError;

/// Accepted spellings for `days_of_week` entries. Abbreviations are rejected.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Schedule
///
/// The scheduling, capacity and age-range columns shared by `courses` and
/// `class_instances`. Embedded (flattened) in both row types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct Schedule {
    /// Full day names, e.g. `["Monday", "Friday"]`.
    pub days_of_week: Vec<String>,
    /// Maximum number of enrolled children.
    pub max_size: i32,
    pub min_age: i32,
    pub max_age: i32,
    pub instructor_id: i32,
    pub program_id: i32,
    #[schema(value_type = String, example = "08:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "12:30:00")]
    pub end_time: NaiveTime,
    #[schema(example = "2022-04-04")]
    pub start_date: NaiveDate,
    #[schema(example = "2022-04-28")]
    pub end_date: NaiveDate,
    pub location: String,
    pub number_of_sessions: i32,
}

impl Schedule {
    pub fn admits_age(&self, age: i32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }
}

/// ScheduleDraft
///
/// Unvalidated schedule fields as received over the wire. Used whole for creation and
/// as a patch (merged onto the stored `Schedule`) for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ScheduleDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_sessions: Option<i32>,
}

impl From<Schedule> for ScheduleDraft {
    fn from(s: Schedule) -> Self {
        Self {
            days_of_week: Some(s.days_of_week),
            max_size: Some(s.max_size),
            min_age: Some(s.min_age),
            max_age: Some(s.max_age),
            instructor_id: Some(s.instructor_id),
            program_id: Some(s.program_id),
            start_time: Some(s.start_time),
            end_time: Some(s.end_time),
            start_date: Some(s.start_date),
            end_date: Some(s.end_date),
            location: Some(s.location),
            number_of_sessions: Some(s.number_of_sessions),
        }
    }
}

impl ScheduleDraft {
    /// Fills every absent field from `base`.
    pub fn merged_onto(self, base: Schedule) -> Self {
        let base = ScheduleDraft::from(base);
        Self {
            days_of_week: self.days_of_week.or(base.days_of_week),
            max_size: self.max_size.or(base.max_size),
            min_age: self.min_age.or(base.min_age),
            max_age: self.max_age.or(base.max_age),
            instructor_id: self.instructor_id.or(base.instructor_id),
            program_id: self.program_id.or(base.program_id),
            start_time: self.start_time.or(base.start_time),
            end_time: self.end_time.or(base.end_time),
            start_date: self.start_date.or(base.start_date),
            end_date: self.end_date.or(base.end_date),
            location: self.location.or(base.location),
            number_of_sessions: self.number_of_sessions.or(base.number_of_sessions),
        }
    }

    /// Checks the rules in a fixed order and reports the first violation.
    pub fn validate(self) -> Result<Schedule, AppError> {
        let location = required_text(self.location, "location")?;

        let days_of_week = validate_days(required(self.days_of_week, "days_of_week")?)?;

        let max_size = required(self.max_size, "max_size")?;
        if max_size < 1 {
            return Err(AppError::bad_request("max_size must be at least 1"));
        }

        let number_of_sessions = required(self.number_of_sessions, "number_of_sessions")?;
        if number_of_sessions < 1 {
            return Err(AppError::bad_request("number_of_sessions must be at least 1"));
        }

        let min_age = required(self.min_age, "min_age")?;
        let max_age = required(self.max_age, "max_age")?;
        if min_age < 0 {
            return Err(AppError::bad_request("min_age must not be negative"));
        }
        if min_age > max_age {
            return Err(AppError::bad_request("min_age must not be greater than max_age"));
        }

        let instructor_id = required(self.instructor_id, "instructor_id")?;
        let program_id = required(self.program_id, "program_id")?;

        let start_time = required(self.start_time, "start_time")?;
        let end_time = required(self.end_time, "end_time")?;
        if start_time >= end_time {
            return Err(AppError::bad_request("start_time must be before end_time"));
        }

        let start_date = required(self.start_date, "start_date")?;
        let end_date = required(self.end_date, "end_date")?;
        if start_date > end_date {
            return Err(AppError::bad_request("start_date must not be after end_date"));
        }

        Ok(Schedule {
            days_of_week,
            max_size,
            min_age,
            max_age,
            instructor_id,
            program_id,
            start_time,
            end_time,
            start_date,
            end_date,
            location,
            number_of_sessions,
        })
    }
}

fn validate_days(days: Vec<String>) -> Result<Vec<String>, AppError> {
    if days.is_empty() {
        return Err(AppError::bad_request(
            "days_of_week must contain at least one day",
        ));
    }
    let mut seen: Vec<String> = Vec::with_capacity(days.len());
    for day in days {
        let day = day.trim().to_string();
        if !DAYS_OF_WEEK.contains(&day.as_str()) {
            return Err(AppError::bad_request(format!(
                "'{day}' is not a valid day of the week"
            )));
        }
        if seen.contains(&day) {
            return Err(AppError::bad_request(format!(
                "days_of_week contains '{day}' more than once"
            )));
        }
        seen.push(day);
    }
    Ok(seen)
}
