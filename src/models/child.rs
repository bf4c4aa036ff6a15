use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{non_blank, normalize_avatar, required, required_text};
use crate::error::AppError;

/// Child
///
/// A row in `children`. Every child belongs to exactly one parent; `profile_id` is set
/// only for children that have their own login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Child {
    pub child_id: i32,
    pub profile_id: Option<i32>,
    pub parent_id: i32,
    pub name: String,
    pub username: String,
    pub age: i32,
    pub avatar_url: Option<String>,
}

/// ChildRequest
///
/// Body for adding (POST /parent/{parent_id}/children) or editing (PUT /children/{id})
/// a child.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ChildRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChild {
    pub name: String,
    pub username: String,
    pub age: i32,
    pub avatar_url: Option<String>,
}

/// Validated partial update; `None` keeps the stored value.
///
/// `avatar_url` is `Some(None)` when the body carried a blank or oversized URL, which
/// clears the stored one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChildUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub age: Option<i32>,
    pub avatar_url: Option<Option<String>>,
}

fn positive_age(age: i32) -> Result<i32, AppError> {
    if age > 0 {
        Ok(age)
    } else {
        Err(AppError::bad_request("age must be a positive number"))
    }
}

impl ChildRequest {
    pub fn validate_new(self) -> Result<NewChild, AppError> {
        Ok(NewChild {
            name: required_text(self.name, "name")?,
            username: required_text(self.username, "username")?,
            age: positive_age(required(self.age, "age")?)?,
            avatar_url: normalize_avatar(self.avatar_url),
        })
    }

    pub fn validate_update(self) -> Result<ChildUpdate, AppError> {
        Ok(ChildUpdate {
            name: non_blank(self.name, "name")?,
            username: non_blank(self.username, "username")?,
            age: self.age.map(positive_age).transpose()?,
            avatar_url: self.avatar_url.map(|url| normalize_avatar(Some(url))),
        })
    }
}
