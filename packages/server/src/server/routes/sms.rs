use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::common::AppError;
use crate::domains::notifications::activities::send_sms;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dev_mode: bool,
}

/// POST /sms/send (admin)
pub async fn send_sms_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SendSmsRequest>, JsonRejection>,
) -> Result<Json<SendSmsResponse>, AppError> {
    let Json(request) = payload?;

    let sent = send_sms(
        &request.phone_number.unwrap_or_default(),
        &request.message.unwrap_or_default(),
        &state.deps,
    )
    .await?;

    Ok(Json(SendSmsResponse {
        success: true,
        message: "SMS sent successfully".to_string(),
        dev_mode: sent.dev_mode,
    }))
}
