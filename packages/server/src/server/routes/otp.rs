use axum::{extract::rejection::JsonRejection, extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::AppError;
use crate::domains::auth::activities::{send_otp, verify_otp};
use crate::domains::auth::DEV_OTP_CODE;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dev_mode: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, alias = "code")]
    pub otp: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub message: String,
    pub verified: bool,
    pub phone_number: String,
    pub is_admin: bool,
    pub token: String,
}

/// POST /otp/send
pub async fn send_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<SendOtpResponse>, AppError> {
    let Json(request) = payload?;
    let phone_number = request.phone_number.unwrap_or_default();

    let sent = send_otp(&phone_number, &state.deps).await?;

    let message = if sent.dev_mode {
        format!("OTP sent successfully (DEV MODE - Use: {})", DEV_OTP_CODE)
    } else {
        "OTP sent successfully".to_string()
    };

    Ok(Json(SendOtpResponse {
        success: true,
        message,
        dev_mode: sent.dev_mode,
        expires_at: sent.expires_at,
    }))
}

/// POST /otp/verify
pub async fn verify_otp_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<VerifyOtpResponse>, AppError> {
    let Json(request) = payload?;
    let phone_number = request.phone_number.unwrap_or_default();
    let code = request.otp.unwrap_or_default();

    let verified = verify_otp(&phone_number, &code, &state.deps).await?;

    Ok(Json(VerifyOtpResponse {
        success: true,
        message: "OTP verified successfully".to_string(),
        verified: true,
        phone_number: verified.phone_number,
        is_admin: verified.is_admin,
        token: verified.token,
    }))
}
