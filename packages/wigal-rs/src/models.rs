use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Character set of a provider-generated OTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OtpType {
    Numeric,
    Alpha,
    Alphanumeric,
}

/// Parameters the provider uses when generating and dispatching an OTP.
///
/// `message_template` may reference `%OTPCODE%` and `%EXPIRY%`; the provider
/// substitutes both before sending.
#[derive(Debug, Clone)]
pub struct OtpOptions {
    pub length: u32,
    pub expiry_minutes: u32,
    pub otp_type: OtpType,
    pub message_template: String,
}

impl Default for OtpOptions {
    fn default() -> Self {
        Self {
            length: 6,
            expiry_minutes: 10,
            otp_type: OtpType::Numeric,
            message_template:
                "Your verification code is: %OTPCODE%. This code expires in %EXPIRY% minutes."
                    .to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateOtpRequest<'a> {
    pub number: &'a str,
    pub expiry: u32,
    pub length: u32,
    pub messagetemplate: &'a str,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
    pub senderid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub otpcode: &'a str,
    pub number: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SmsDestination<'a> {
    pub destination: &'a str,
    pub msgid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendSmsRequest<'a> {
    pub senderid: &'a str,
    pub destinations: Vec<SmsDestination<'a>>,
    pub message: &'a str,
    pub smstype: &'static str,
}

/// Decoded JSON body of a FROG API response.
///
/// The API is loose about field types, so the raw document is kept and the
/// handful of fields we care about are read leniently.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub http_status: u16,
    pub body: Value,
}

impl ProviderResponse {
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    pub fn valid(&self) -> Option<bool> {
        self.body.get("valid").and_then(Value::as_bool)
    }

    /// First human-readable message the provider put in the body
    pub fn message(&self) -> Option<&str> {
        ["message", "error", "errorMessage"]
            .iter()
            .find_map(|key| {
                self.body
                    .get(*key)
                    .and_then(Value::as_str)
                    .filter(|msg| !msg.trim().is_empty())
            })
    }
}
