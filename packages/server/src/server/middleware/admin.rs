use axum::{extract::Request, middleware::Next, response::Response};
use tracing::warn;

use super::AuthUser;
use crate::common::AppError;

/// Reject callers without an admin verification token.
///
/// Must run after `jwt_auth_middleware`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let caller = request.extensions().get::<AuthUser>().cloned();

    match caller {
        None => Err(AppError::AuthenticationRequired),
        Some(user) if !user.is_admin => {
            warn!(phone = %user.phone_number, path = %request.uri().path(), "Non-admin caller on admin route");
            Err(AppError::AdminRequired)
        }
        Some(_) => Ok(next.run(request).await),
    }
}
