use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    /// The caller id in the string form the services accept
    pub fn caller(&self) -> String {
        self.user_id.to_string()
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects [`AuthUser`]
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let claims = validate_jwt(&token, &state.security).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized("invalid token present on request's header")
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated user {} ({})", auth_user.user_id, auth_user.email);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Bearer token from Authorization, or the bare `token` header older clients send
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    if let Some(auth_header) = headers.get("authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| "Invalid Authorization header format".to_string())?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            Some(_) => Err("Empty JWT token".to_string()),
            None => Err("Authorization header must use Bearer token format".to_string()),
        };
    }

    match headers.get("token").and_then(|v| v.to_str().ok()) {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err("missing token on request's header".to_string()),
    }
}
