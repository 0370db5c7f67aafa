use crate::domains::auth::JwtService;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Caller identity taken from a verification token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub phone_number: String,
    pub is_admin: bool,
}

/// Attach the caller's [`AuthUser`] when the request carries a valid token.
///
/// Never rejects: routes that need a caller check the extension themselves
/// (see `require_admin`).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match extract_auth_user(request.headers(), &jwt_service) {
        Some(user) => {
            debug!(phone = %user.phone_number, is_admin = user.is_admin, "Authenticated caller");
            request.extensions_mut().insert(user);
        }
        None => debug!("No valid verification token"),
    }

    next.run(request).await
}

/// `Authorization: Bearer <token>`, or the bare token
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

fn extract_auth_user(headers: &HeaderMap, jwt_service: &JwtService) -> Option<AuthUser> {
    let claims = jwt_service.verify_token(bearer_token(headers)?).ok()?;

    Some(AuthUser {
        phone_number: claims.phone_number,
        is_admin: claims.is_admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_with_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let token = jwt_service.create_token("0542709440", true).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(request.headers(), &jwt_service).unwrap();
        assert_eq!(auth_user.phone_number, "0542709440");
        assert!(auth_user.is_admin);
    }

    #[test]
    fn test_extract_token_without_bearer() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let token = jwt_service.create_token("0542709440", false).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(request.headers(), &jwt_service).unwrap();
        assert!(!auth_user.is_admin);
    }

    #[test]
    fn test_no_auth_header() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(request.headers(), &jwt_service).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let jwt_service = JwtService::new("test_secret", "test_issuer".to_string());
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(request.headers(), &jwt_service).is_none());
    }

    #[test]
    fn test_empty_bearer_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, "  Bearer abc.def  ".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
