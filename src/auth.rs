use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::{Profile, Role},
    repository::{ProfileStore, RepositoryState},
};

/// Header that authenticates as an existing profile in `Env::Local`.
pub const DEV_OKTA_ID_HEADER: &str = "x-okta-id";

/// Claims
///
/// Payload expected inside the identity provider's bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the provider's user id, stored as `profiles.okta_id`.
    pub sub: String,
    /// Expiration time; always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Claims {
    /// Display name for a profile created on first login.
    fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.sub)
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers take it as an argument;
/// role and ownership guards read `role` and `profile_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub profile_id: i32,
    pub okta_id: String,
    pub role: Role,
}

impl From<Profile> for AuthUser {
    fn from(profile: Profile) -> Self {
        Self {
            role: profile.role(),
            profile_id: profile.profile_id,
            okta_id: profile.okta_id,
        }
    }
}

/// Builds the token validation rules from configuration.
pub fn validation_for(config: &AppConfig) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    if let Some(issuer) = &config.jwt_issuer {
        validation.set_issuer(&[issuer]);
    }
    match &config.jwt_audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    validation
}

/// Decodes and validates a bearer token, returning its claims.
pub fn verify_token(token: &str, config: &AppConfig) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    decode::<Claims>(token, &key, &validation_for(config))
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Unauthorized
        })
}

/// AuthUser extractor
///
/// 1. Local bypass: in `Env::Local` an `x-okta-id` header naming an existing profile is
///    accepted without a token. Unknown ids fall through.
/// 2. Bearer token extraction and HS256 validation.
/// 3. Find-or-create of the profile for the token subject.
///
/// Rejects with 401 on any credential failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let dev_id = parts
                .headers
                .get(DEV_OKTA_ID_HEADER)
                .and_then(|value| value.to_str().ok());
            if let Some(okta_id) = dev_id {
                if let Some(profile) = repo.find_profile_by_okta_id(okta_id).await? {
                    let user = AuthUser::from(profile);
                    parts.extensions.insert(user.clone());
                    return Ok(user);
                }
            }
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = verify_token(token.trim(), &config)?;

        let profile = repo
            .find_or_create_profile(&claims.sub, claims.display_name(), claims.email.as_deref())
            .await?;

        let user = AuthUser::from(profile);
        // The route layer resolves the user once; handlers reuse it.
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
