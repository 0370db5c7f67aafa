//! Auth domain data types and OTP policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wigal::{OtpOptions, OtpType};

/// Code every dev-mode OTP is issued with
pub const DEV_OTP_CODE: &str = "123456";

pub const OTP_LENGTH: u32 = 6;
pub const OTP_EXPIRY_MINUTES: u32 = 10;
pub const OTP_MESSAGE_TEMPLATE: &str =
    "Your HostelHQ verification code is: %OTPCODE%. This code expires in %EXPIRY% minutes.";

/// Parameters the SMS provider generates codes with
pub fn otp_options() -> OtpOptions {
    OtpOptions {
        length: OTP_LENGTH,
        expiry_minutes: OTP_EXPIRY_MINUTES,
        otp_type: OtpType::Numeric,
        message_template: OTP_MESSAGE_TEMPLATE.to_string(),
    }
}

/// Result of sending an OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSent {
    pub phone_number: String,
    pub dev_mode: bool,
    pub expires_at: DateTime<Utc>,
}

/// Result of verifying an OTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerified {
    pub phone_number: String,
    pub is_admin: bool,
    pub token: String,
}

/// An OTP record as shown to admins
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRecordSummary {
    #[serde(flatten)]
    pub record: super::models::OtpVerification,
    pub expired: bool,
}
