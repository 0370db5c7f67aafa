//! Send OTP action

use chrono::{Duration, Utc};
use tracing::{error, info, warn};

use crate::common::{AppError, PhoneNumber};
use crate::domains::auth::models::NewOtpVerification;
use crate::domains::auth::types::{
    otp_options, OtpSent, DEV_OTP_CODE, OTP_EXPIRY_MINUTES, OTP_LENGTH,
};
use crate::kernel::ServerDeps;

/// Issue an OTP for a phone number.
///
/// Prod mode has the SMS provider generate and text the code; dev mode skips
/// the provider and issues [`DEV_OTP_CODE`]. Either way the pending tracking
/// record for the number is replaced, so only the latest code is verifiable.
pub async fn send_otp(phone_number: &str, deps: &ServerDeps) -> Result<OtpSent, AppError> {
    if phone_number.trim().is_empty() {
        return Err(AppError::validation("Phone number is required"));
    }

    let phone = PhoneNumber::parse(phone_number);
    if phone.is_empty() {
        return Err(AppError::validation("Phone number must contain digits"));
    }
    if !phone.is_recognized() {
        warn!(phone = %phone, "Phone number is not in a known Ghana format, using it as entered");
    }

    let canonical = phone.canonical();
    let dev_mode = deps.otp_mode.is_dev();
    let now = Utc::now();

    let otp = if dev_mode {
        info!(phone = %canonical, "Dev mode: skipping SMS provider, fixed dev code issued");
        Some(DEV_OTP_CODE.to_string())
    } else {
        // Provider first: a failed send leaves the previous pending record,
        // and its code, in place.
        let provider = deps.sms_provider()?;
        provider
            .send_otp(&canonical, &otp_options())
            .await
            .map_err(|e| {
                error!(phone = %canonical, error = %e, "Failed to send OTP");
                AppError::from_provider(e)
            })?;
        None
    };

    let record = deps
        .otp_store
        .replace_pending(NewOtpVerification {
            phone_number: canonical.clone(),
            otp,
            created_at: now,
            expires_at: now + Duration::minutes(OTP_EXPIRY_MINUTES as i64),
            length: OTP_LENGTH as i32,
            is_dev: dev_mode,
        })
        .await?;

    info!(phone = %canonical, record_id = %record.id, dev_mode, "OTP sent");

    Ok(OtpSent {
        phone_number: canonical,
        dev_mode,
        expires_at: record.expires_at,
    })
}
