use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;

use super::{Schedule, ScheduleDraft, non_blank, required_text};
use crate::error::AppError;

/// ClassInstance
///
/// A scheduled occurrence of a course offering, stored in `class_instances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema, FromRow)]
#[ts(export)]
pub struct ClassInstance {
    pub class_id: i32,
    pub class_name: String,
    pub class_description: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: Schedule,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub program_name: Option<String>,
}

/// ClassInstanceRequest
///
/// Body for POST /class-instance (every field required) and PUT
/// /class-instance/{class_id} (partial, merged onto the stored row).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ClassInstanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_description: Option<String>,
    #[serde(flatten)]
    pub schedule: ScheduleDraft,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClassInstance {
    pub class_name: String,
    pub class_description: String,
    pub schedule: Schedule,
}

impl ClassInstanceRequest {
    pub fn validate(self) -> Result<NewClassInstance, AppError> {
        Ok(NewClassInstance {
            class_name: required_text(self.class_name, "class_name")?,
            class_description: required_text(self.class_description, "class_description")?,
            schedule: self.schedule.validate()?,
        })
    }

    /// Applies this request as a patch to `current` and re-checks the merged result, so a
    /// partial update cannot leave the row inconsistent (e.g. `min_age > max_age`).
    pub fn apply_to(self, current: ClassInstance) -> Result<NewClassInstance, AppError> {
        let class_name = non_blank(self.class_name, "class_name")?.unwrap_or(current.class_name);
        let class_description = non_blank(self.class_description, "class_description")?
            .unwrap_or(current.class_description);
        Ok(NewClassInstance {
            class_name,
            class_description,
            schedule: self.schedule.merged_onto(current.schedule).validate()?,
        })
    }
}
