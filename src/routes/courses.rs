use crate::{AppState, handlers::courses};
use axum::{Router, routing::get};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/course",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/course/{course_id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
}
