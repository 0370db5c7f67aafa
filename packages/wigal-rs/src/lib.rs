// Client for the Wigal FROG SMS API: https://frogdocs.wigal.com.gh

pub mod models;

use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    GenerateOtpRequest, SendSmsRequest, SmsDestination, VerifyOtpRequest,
};
pub use crate::models::{OtpOptions, OtpType, ProviderResponse};

pub const DEFAULT_API_URL: &str = "https://frogapi.wigal.com.gh";
pub const DEFAULT_SENDER_ID: &str = "HostelHQ";

/// Body `status` values the API uses to report success
const SUCCESS_STATUSES: &[&str] = &["SUCCESS", "ACCEPTD", "ACCEPTED", "OK"];

#[derive(Debug, thiserror::Error)]
pub enum WigalError {
    #[error("SMS provider credentials are not configured (missing: {})", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Authentication failed. Please check your Wigal API credentials (API-KEY and USERNAME).")]
    Authentication,

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response from SMS service: {0}")]
    InvalidResponse(String),

    #[error("Request to SMS service failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct WigalOptions {
    pub api_key: String,
    pub username: String,
    pub api_url: String,
    pub sender_id: String,
}

impl WigalOptions {
    /// Build options from optional credentials, reporting every missing one.
    pub fn new(api_key: Option<String>, username: Option<String>) -> Result<Self, WigalError> {
        let api_key = api_key.filter(|v| !v.trim().is_empty());
        let username = username.filter(|v| !v.trim().is_empty());

        match (api_key, username) {
            (Some(api_key), Some(username)) => Ok(Self {
                api_key,
                username,
                api_url: DEFAULT_API_URL.to_string(),
                sender_id: DEFAULT_SENDER_ID.to_string(),
            }),
            (api_key, username) => {
                let mut missing = Vec::new();
                if api_key.is_none() {
                    missing.push("WIGAL_API_KEY");
                }
                if username.is_none() {
                    missing.push("WIGAL_USERNAME");
                }
                Err(WigalError::MissingCredentials { missing })
            }
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_sender_id(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = sender_id.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct WigalService {
    options: WigalOptions,
    client: Client,
}

impl WigalService {
    pub fn new(options: WigalOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn sender_id(&self) -> &str {
        &self.options.sender_id
    }

    /// Ask the provider to generate an OTP and text it to `number`.
    ///
    /// The code itself never leaves the provider.
    pub async fn generate_otp(
        &self,
        number: &str,
        options: &OtpOptions,
    ) -> Result<ProviderResponse, WigalError> {
        let body = GenerateOtpRequest {
            number,
            expiry: options.expiry_minutes,
            length: options.length,
            messagetemplate: &options.message_template,
            otp_type: options.otp_type,
            senderid: &self.options.sender_id,
        };

        debug!(phone = %number, sender_id = %self.options.sender_id, "Requesting OTP from Wigal");
        self.post("/api/v3/sms/otp/generate", &body).await
    }

    /// Check `code` against the OTP the provider issued for `number`.
    pub async fn verify_otp(&self, number: &str, code: &str) -> Result<ProviderResponse, WigalError> {
        let body = VerifyOtpRequest {
            otpcode: code,
            number,
        };

        debug!(phone = %number, "Verifying OTP with Wigal");
        self.post("/api/v3/sms/otp/verify", &body).await
    }

    /// Send a plain text message. `msg_id` must be unique per message.
    pub async fn send_sms(
        &self,
        number: &str,
        message: &str,
        msg_id: &str,
    ) -> Result<ProviderResponse, WigalError> {
        let body = SendSmsRequest {
            senderid: &self.options.sender_id,
            destinations: vec![SmsDestination {
                destination: number,
                msgid: msg_id,
            }],
            message,
            smstype: "text",
        };

        debug!(phone = %number, message_length = message.len(), "Sending SMS via Wigal");
        self.post("/api/v3/sms/send", &body).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ProviderResponse, WigalError> {
        let url = format!("{}{}", self.options.api_url, path);

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("API-KEY", &self.options.api_key)
            .header("USERNAME", &self.options.username)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, path, "Request to Wigal failed");
                WigalError::Http(e)
            })?;

        let status = response.status();
        let text = response.text().await?;

        interpret_response(status, &text).inspect_err(|e| {
            warn!(status = status.as_u16(), error = %e, path, "Wigal returned an error");
        })
    }
}

/// Turn a raw FROG API reply into a success payload or a typed error.
pub fn interpret_response(status: StatusCode, text: &str) -> Result<ProviderResponse, WigalError> {
    let trimmed = text.trim();

    // Misconfigured credentials or gateway errors come back as HTML pages
    if trimmed.starts_with('<') {
        return Err(WigalError::InvalidResponse(
            "SMS service returned an HTML page instead of JSON".to_string(),
        ));
    }

    let body: Value = if trimmed.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(trimmed).map_err(|e| WigalError::InvalidResponse(e.to_string()))?
    };

    let response = ProviderResponse {
        http_status: status.as_u16(),
        body,
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(WigalError::Authentication);
    }

    if !status.is_success() {
        let message = response
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        return Err(WigalError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let status_failed = response
        .status()
        .is_some_and(|s| !SUCCESS_STATUSES.iter().any(|ok| ok.eq_ignore_ascii_case(s)));

    if response.valid() == Some(false) || status_failed {
        let message = response
            .message()
            .unwrap_or("Request was not accepted by the SMS service")
            .to_string();
        return Err(WigalError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}
