//! Send SMS action

use serde::Serialize;
use tracing::{error, info};

use crate::common::{AppError, PhoneNumber};
use crate::kernel::ServerDeps;

/// Longest message accepted (ten concatenated SMS segments)
pub const MAX_SMS_LENGTH: usize = 1530;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsSent {
    pub phone_number: String,
    pub dev_mode: bool,
}

/// Send a plain text SMS. Dev mode only logs the message.
pub async fn send_sms(
    phone_number: &str,
    message: &str,
    deps: &ServerDeps,
) -> Result<SmsSent, AppError> {
    let message = message.trim();
    if phone_number.trim().is_empty() || message.is_empty() {
        return Err(AppError::validation("Phone number and message are required"));
    }
    if message.chars().count() > MAX_SMS_LENGTH {
        return Err(AppError::validation(format!(
            "Message is too long (max {} characters)",
            MAX_SMS_LENGTH
        )));
    }

    let phone = PhoneNumber::parse(phone_number);
    if phone.is_empty() {
        return Err(AppError::validation("Phone number must contain digits"));
    }
    let canonical = phone.canonical();

    if deps.otp_mode.is_dev() {
        info!(phone = %canonical, message_length = message.len(), "Dev mode: SMS not sent");
        return Ok(SmsSent {
            phone_number: canonical,
            dev_mode: true,
        });
    }

    deps.sms_provider()?
        .send_sms(&canonical, message)
        .await
        .map_err(|e| {
            error!(phone = %canonical, error = %e, "Failed to send SMS");
            AppError::from_provider(e)
        })?;

    info!(phone = %canonical, "SMS sent");
    Ok(SmsSent {
        phone_number: canonical,
        dev_mode: false,
    })
}
