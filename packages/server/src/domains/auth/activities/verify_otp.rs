//! Verify OTP action

use chrono::Utc;
use tracing::{error, info, warn};
use wigal::WigalError;

use crate::common::{AppError, PhoneNumber};
use crate::domains::auth::models::{is_admin_phone, OtpVerification};
use crate::domains::auth::types::OtpVerified;
use crate::kernel::ServerDeps;

const INVALID_CODE: &str = "Invalid or expired OTP. Please try again.";

/// Verify an OTP code and issue a verification token.
///
/// Dev mode compares against the stored dev record. Prod mode only trusts the
/// SMS provider; local records never hold the real code. On success the most
/// recent pending record for the number is marked verified.
pub async fn verify_otp(
    phone_number: &str,
    code: &str,
    deps: &ServerDeps,
) -> Result<OtpVerified, AppError> {
    let code = code.trim();
    if phone_number.trim().is_empty() || code.is_empty() {
        return Err(AppError::validation("Phone number and OTP are required"));
    }

    let phone = PhoneNumber::parse(phone_number);
    if phone.is_empty() {
        return Err(AppError::validation("Phone number must contain digits"));
    }
    let canonical = phone.canonical();

    let pending = if deps.otp_mode.is_dev() {
        Some(check_dev_code(&canonical, code, deps).await?)
    } else {
        check_with_provider(&canonical, code, deps).await?;
        deps.otp_store.find_latest_pending(&canonical).await?
    };

    match pending {
        Some(record) => {
            if deps.otp_store.mark_verified(record.id).await?.is_none() {
                // Replaced by a newer issuance between lookup and update
                warn!(phone = %canonical, record_id = %record.id, "Pending OTP record was already gone");
            }
        }
        None => info!(phone = %canonical, "No pending OTP record to mark verified"),
    }

    let is_admin = is_admin_phone(&phone, &deps.admin_phone_numbers);
    let token = deps.jwt_service.create_token(&canonical, is_admin)?;

    info!(phone = %canonical, is_admin, "OTP verified");

    Ok(OtpVerified {
        phone_number: canonical,
        is_admin,
        token,
    })
}

async fn check_dev_code(
    phone_number: &str,
    code: &str,
    deps: &ServerDeps,
) -> Result<OtpVerification, AppError> {
    let record = deps
        .otp_store
        .find_latest_pending(phone_number)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                "No pending OTP for this phone number. Please request a new code.".to_string(),
            )
        })?;

    if !record.is_dev {
        warn!(phone = %phone_number, "Pending OTP was issued in prod mode, cannot check it locally");
        return Err(AppError::InvalidCode(INVALID_CODE.to_string()));
    }

    if record.is_expired(Utc::now()) {
        return Err(AppError::InvalidCode(
            "OTP has expired. Please request a new code.".to_string(),
        ));
    }

    if record.otp.as_deref() != Some(code) {
        return Err(AppError::InvalidCode(INVALID_CODE.to_string()));
    }

    Ok(record)
}

async fn check_with_provider(
    phone_number: &str,
    code: &str,
    deps: &ServerDeps,
) -> Result<(), AppError> {
    let provider = deps.sms_provider()?;

    provider
        .verify_otp(phone_number, code)
        .await
        .map_err(|e| match e {
            // 5xx is an outage, not a verdict on the code
            WigalError::Rejected { status, message } if status < 500 => {
                info!(phone = %phone_number, reason = %message, "Provider rejected OTP");
                AppError::InvalidCode(message)
            }
            other => {
                error!(phone = %phone_number, error = %other, "OTP verification failed");
                AppError::from_provider(other)
            }
        })
}
