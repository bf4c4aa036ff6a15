//! Router Module Index
//!
//! One router per resource. Everything except `public` sits behind the authentication
//! route layer applied in `create_router`; role and ownership checks run in the handlers.

/// Unauthenticated routes (health check).
pub mod public;

pub mod children;
pub mod class_instances;
pub mod courses;
pub mod parents;
pub mod profiles;

use axum::Router;

use crate::AppState;

/// Every resource router merged into one, ready for the auth layer.
pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .merge(profiles::profile_routes())
        .merge(parents::parent_routes())
        .merge(children::children_routes())
        .merge(courses::course_routes())
        .merge(class_instances::class_instance_routes())
}
