use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult, ErrorResponse},
    extract::ApiJson,
    guards,
    models::{
        NewProfileRequest, Profile, ProfileMessage, ProfileWithRole, Role, UpdateProfileRequest,
    },
    repository::ProfileStore,
};

/// get_me
///
/// The caller's own profile, as resolved by the auth extractor.
#[utoipa::path(
    get,
    path = "/me",
    tag = "profiles",
    responses((status = 200, description = "Caller's profile", body = Profile))
)]
pub async fn get_me(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Profile>> {
    let profile = guards::profile_exists(state.repo.as_ref(), &user.okta_id).await?;
    Ok(Json(profile))
}

#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profiles",
    responses((status = 200, description = "All profiles", body = [Profile]))
)]
pub async fn list_profiles(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Profile>>> {
    Ok(Json(state.repo.list_profiles().await?))
}

/// get_profiles_by_role
///
/// Profiles of one role, joined with their instructor/parent/child row id.
#[utoipa::path(
    get,
    path = "/profiles/role/{role_id}",
    tag = "profiles",
    params(("role_id" = i32, Path, description = "1 super_admin, 2 admin, 3 instructor, 4 parent, 5 child")),
    responses(
        (status = 200, description = "Profiles with that role", body = [ProfileWithRole]),
        (status = 400, description = "Unknown role", body = ErrorResponse)
    )
)]
pub async fn get_profiles_by_role(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
) -> AppResult<Json<Vec<ProfileWithRole>>> {
    let role = Role::from_id(role_id)
        .ok_or_else(|| AppError::bad_request(format!("role_id {role_id} is not a valid role")))?;
    Ok(Json(state.repo.find_profiles_by_role(role).await?))
}

#[utoipa::path(
    get,
    path = "/profiles/{okta_id}",
    tag = "profiles",
    params(("okta_id" = String, Path, description = "Identity provider subject")),
    responses(
        (status = 200, description = "Found", body = Profile),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(okta_id): Path<String>,
) -> AppResult<Json<Profile>> {
    let profile = guards::profile_exists(state.repo.as_ref(), &okta_id).await?;
    Ok(Json(profile))
}

/// create_profile
///
/// [Admin] Registers a profile ahead of its first login, e.g. to onboard an instructor.
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "profiles",
    request_body = NewProfileRequest,
    responses(
        (status = 200, description = "Created", body = ProfileMessage),
        (status = 400, description = "Invalid body or duplicate okta_id", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn create_profile(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewProfileRequest>,
) -> AppResult<Json<ProfileMessage>> {
    guards::require_admin(&user)?;
    let new_profile = payload.validate()?;

    if state
        .repo
        .find_profile_by_okta_id(&new_profile.okta_id)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request("profile already exists"));
    }

    let profile = state.repo.create_profile(new_profile).await?;
    tracing::info!(profile_id = profile.profile_id, role_id = profile.role_id, "profile created");
    Ok(Json(ProfileMessage {
        message: "profile created".to_string(),
        profile,
    }))
}

/// update_profile
///
/// [Owner or Admin] Partial update. Only admins may change `role_id`.
#[utoipa::path(
    put,
    path = "/profiles/{okta_id}",
    tag = "profiles",
    params(("okta_id" = String, Path, description = "Identity provider subject")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated", body = ProfileMessage),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Path(okta_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProfileRequest>,
) -> AppResult<Json<ProfileMessage>> {
    let repo = state.repo.as_ref();
    guards::profile_exists(repo, &okta_id).await?;
    guards::ensure_profile_owner(&user, &okta_id)?;
    if payload.role_id.is_some() && !user.role.is_admin() {
        return Err(AppError::forbidden("only an admin may change a profile's role"));
    }
    let changes = payload.validate()?;

    let profile = repo
        .update_profile(&okta_id, changes)
        .await?
        .ok_or_else(|| AppError::not_found(format!("profile with okta id {okta_id} is not found")))?;
    Ok(Json(ProfileMessage {
        message: "profile updated".to_string(),
        profile,
    }))
}

#[utoipa::path(
    delete,
    path = "/profiles/{okta_id}",
    tag = "profiles",
    params(("okta_id" = String, Path, description = "Identity provider subject")),
    responses(
        (status = 200, description = "Deleted", body = ProfileMessage),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Path(okta_id): Path<String>,
) -> AppResult<Json<ProfileMessage>> {
    let repo = state.repo.as_ref();
    guards::profile_exists(repo, &okta_id).await?;
    guards::ensure_profile_owner(&user, &okta_id)?;

    let profile = repo
        .delete_profile(&okta_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("profile with okta id {okta_id} is not found")))?;
    tracing::info!(profile_id = profile.profile_id, "profile deleted");
    Ok(Json(ProfileMessage {
        message: format!("Profile '{okta_id}' was deleted."),
        profile,
    }))
}
