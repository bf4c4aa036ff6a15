use crate::{AppState, handlers::class_instances};
use axum::{Router, routing::get};

pub fn class_instance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/class-instance",
            get(class_instances::list_class_instances)
                .post(class_instances::create_class_instance),
        )
        .route(
            "/class-instance/{class_id}",
            get(class_instances::get_class_instance)
                .put(class_instances::update_class_instance)
                .delete(class_instances::delete_class_instance),
        )
}
