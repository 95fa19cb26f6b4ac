use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub sub: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            sub: claims.sub,
            role: claims.role,
        }
    }
}

/// Gate for /adminBook routes: valid bearer token whose role claim is the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;

    let security = &state.config.security;
    let claims = validate_jwt(&token, &security.jwt_secret).map_err(|e| {
        tracing::debug!("Rejected admin token: {}", e);
        ApiError::unauthorized(e.to_string())
    })?;

    if claims.role != security.admin_role {
        tracing::warn!("User '{}' with role '{}' attempted an admin route", claims.sub, claims.role);
        return Err(ApiError::forbidden("Admin role required"));
    }

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn non_bearer_schemes_are_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(extract_jwt_from_headers(&headers).is_err());
        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
    }
}
