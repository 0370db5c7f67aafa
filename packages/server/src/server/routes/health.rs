use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;
use std::time::Duration;

use crate::kernel::BaseOtpStore;
use crate::server::app::AppState;

const STORE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    database: StoreHealth,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreHealth {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Ask the OTP store for a trivial round trip, bounded by five seconds.
pub async fn check_store(store: &dyn BaseOtpStore) -> StoreHealth {
    let error = match tokio::time::timeout(STORE_TIMEOUT, store.health_check()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Query failed: {}", e)),
        Err(_) => Some(format!("Query timeout (>{}s)", STORE_TIMEOUT.as_secs())),
    };

    StoreHealth {
        status: if error.is_none() { "ok" } else { "error" },
        error,
    }
}

/// GET /health: 200 while the OTP store answers, 503 otherwise
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database = check_store(state.deps.otp_store.as_ref()).await;

    if database.is_ok() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database,
            }),
        )
    } else {
        tracing::warn!(error = ?database.error, "Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy",
                database,
            }),
        )
    }
}
