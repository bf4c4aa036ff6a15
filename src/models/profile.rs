use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{Role, non_blank, normalize_avatar, required, required_text};
use crate::error::AppError;

/// Profile
///
/// The root identity record in `profiles`. `okta_id` is the subject issued by the
/// identity provider; `role_id` is one of the fixed `Role` ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    pub profile_id: i32,
    pub okta_id: String,
    pub role_id: i32,
    pub name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Unknown ids (only possible through manual edits) are treated as the least
    /// privileged role.
    pub fn role(&self) -> Role {
        Role::from_id(self.role_id).unwrap_or(Role::Child)
    }
}

/// ProfileWithRole
///
/// A profile joined with the id of its role-specific row, if it has one.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ProfileWithRole {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub profile: Profile,
    pub instructor_id: Option<i32>,
    pub parent_id: Option<i32>,
    pub child_id: Option<i32>,
}

/// NewProfileRequest
///
/// Input payload for POST /profiles. Fields are optional so presence is reported as a
/// 400 with the field name instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct NewProfileRequest {
    pub okta_id: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<i32>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

/// Validated form of `NewProfileRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub okta_id: String,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl NewProfileRequest {
    pub fn validate(self) -> Result<NewProfile, AppError> {
        let okta_id = required_text(self.okta_id, "okta_id")?;
        let name = required_text(self.name, "name")?;
        let role_id = required(self.role_id, "role_id")?;
        let role = Role::from_id(role_id)
            .ok_or_else(|| AppError::bad_request(format!("role_id {role_id} is not a valid role")))?;
        Ok(NewProfile {
            okta_id,
            name,
            role,
            email: non_blank(self.email, "email")?,
            avatar_url: normalize_avatar(self.avatar_url),
        })
    }
}

/// UpdateProfileRequest
///
/// Partial update payload for PUT /profiles/{okta_id}. Absent fields keep their stored
/// value.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i32>,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<Self, AppError> {
        if let Some(role_id) = self.role_id {
            if Role::from_id(role_id).is_none() {
                return Err(AppError::bad_request(format!(
                    "role_id {role_id} is not a valid role"
                )));
            }
        }
        Ok(Self {
            name: non_blank(self.name, "name")?,
            email: non_blank(self.email, "email")?,
            avatar_url: normalize_avatar(self.avatar_url),
            role_id: self.role_id,
        })
    }
}
