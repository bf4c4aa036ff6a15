use crate::{AppState, handlers::profiles};
use axum::{Router, routing::get};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        // GET /me
        // The caller's profile, created on first login.
        .route("/me", get(profiles::get_me))
        .route(
            "/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route("/profiles/role/{role_id}", get(profiles::get_profiles_by_role))
        .route(
            "/profiles/{okta_id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
}
