use crate::{AppState, handlers::children};
use axum::{Router, routing::get};

pub fn children_routes() -> Router<AppState> {
    Router::new()
        .route("/children", get(children::list_children))
        .route(
            "/children/{id}",
            get(children::get_child)
                .put(children::update_child)
                .delete(children::delete_child),
        )
        // --- Enrollments ---
        .route(
            "/children/{id}/enrollments",
            get(children::get_enrollments).post(children::enroll_child),
        )
        .route(
            "/children/{id}/enrollments/{course_id}",
            axum::routing::put(children::update_enrollment).delete(children::unenroll_child),
        )
}
