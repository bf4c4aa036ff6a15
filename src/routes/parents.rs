use crate::{AppState, handlers::parents};
use axum::{Router, routing::get};

pub fn parent_routes() -> Router<AppState> {
    Router::new()
        // GET /parent/{profile_id}/children
        // Looked up by the parent's *profile* id, so a client can go straight from /me.
        // POST /parent/{parent_id}/children
        // Takes the parents-table id instead. Both share the path segment, hence one route.
        .route(
            "/parent/{id}/children",
            get(parents::get_parent_children).post(parents::add_child),
        )
        // GET /parent/{profile_id}/schedules
        .route("/parent/{id}/schedules", get(parents::get_child_schedules))
}
