use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod guards;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use auth::AuthUser;
use routes::public;

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use repository::{PostgresRepository, Repository, RepositoryState};

/// ApiDoc
///
/// OpenAPI document for every resource router, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::profiles::get_me, handlers::profiles::list_profiles,
        handlers::profiles::get_profiles_by_role, handlers::profiles::get_profile,
        handlers::profiles::create_profile, handlers::profiles::update_profile,
        handlers::profiles::delete_profile,
        handlers::parents::get_parent_children, handlers::parents::get_child_schedules,
        handlers::parents::add_child,
        handlers::children::list_children, handlers::children::get_child,
        handlers::children::update_child, handlers::children::delete_child,
        handlers::children::get_enrollments, handlers::children::enroll_child,
        handlers::children::update_enrollment, handlers::children::unenroll_child,
        handlers::courses::list_courses, handlers::courses::get_course,
        handlers::courses::create_course, handlers::courses::update_course,
        handlers::courses::delete_course,
        handlers::class_instances::list_class_instances,
        handlers::class_instances::get_class_instance,
        handlers::class_instances::create_class_instance,
        handlers::class_instances::update_class_instance,
        handlers::class_instances::delete_class_instance
    ),
    components(
        schemas(
            models::Profile, models::ProfileWithRole, models::NewProfileRequest,
            models::UpdateProfileRequest, models::Role, models::Parent, models::Instructor,
            models::ParentChild, models::ChildSchedule, models::Child, models::ChildRequest,
            models::Enrollment, models::EnrolledCourse, models::EnrollRequest,
            models::UpdateEnrollmentRequest, models::Schedule, models::ScheduleDraft,
            models::Course, models::CourseRequest, models::ClassInstance,
            models::ClassInstanceRequest, models::MessageResponse, models::ProfileMessage,
            models::ChildMessage, models::EnrollmentMessage, models::CourseCreated,
            models::CourseUpdated, models::ClassInstanceCreated, models::ClassInstanceUpdated,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "profiles", description = "Accounts of every role"),
        (name = "parents", description = "Parents and the children they manage"),
        (name = "children", description = "Children and their enrollments"),
        (name = "courses", description = "Course offerings"),
        (name = "class_instances", description = "Scheduled class instances")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The shared, immutable container handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Persistence behind the per-resource store traits.
    pub repo: RepositoryState,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repo: RepositoryState, config: AppConfig) -> Self {
        Self { repo, config }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Runs the `AuthUser` extractor before any resource handler. A failed token check or
/// profile lookup rejects with 401 and the handler never executes. The resolved user is
/// cached in the request extensions for the handler's own `AuthUser` argument.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing tree and registers the shared state.
///
/// Public routes (`/health`, Swagger UI) sit outside the auth layer. Every resource
/// router is merged under one `route_layer`, so unmatched paths still 404 instead of
/// 401. Role and ownership checks happen inside the handlers, after authentication.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI plus the raw OpenAPI JSON.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: no auth.
        .merge(public::public_routes())
        // Resource Routes: profiles, parents, children, courses, class instances.
        .merge(
            routes::resource_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, tagged with its id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id on the response.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer (outermost)
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`. Reads the `x-request-id` set by `SetRequestIdLayer`
/// and records it next to the method and URI, so every log line a request emits
/// carries the same id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    // Field names match the JSON log schema used in production.
    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
