use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// How OTPs are issued and checked.
///
/// `Dev` never talks to the SMS provider: every code is [`DEV_OTP_CODE`].
///
/// [`DEV_OTP_CODE`]: crate::domains::auth::DEV_OTP_CODE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMode {
    Dev,
    Prod,
}

impl OtpMode {
    pub fn is_dev(self) -> bool {
        self == OtpMode::Dev
    }
}

impl FromStr for OtpMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(OtpMode::Dev),
            "prod" | "production" => Ok(OtpMode::Prod),
            other => bail!("OTP_MODE must be 'dev' or 'prod', got '{}'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub otp_mode: OtpMode,
    pub wigal_api_key: Option<String>,
    pub wigal_username: Option<String>,
    pub wigal_api_url: String,
    pub wigal_sender_id: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub admin_phone_numbers: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub rate_limit_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Both the WIGAL_* and the older FROG_SMS_* names are accepted
        let first_of = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        };

        let otp_mode = match lookup("OTP_MODE") {
            Some(mode) => mode.parse()?,
            None if is_truthy(lookup("DEV_MODE").as_deref()) => OtpMode::Dev,
            None => OtpMode::Prod,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            otp_mode,
            wigal_api_key: first_of(&["WIGAL_API_KEY", "FROG_SMS_API_KEY"]),
            wigal_username: first_of(&["WIGAL_USERNAME", "FROG_SMS_USERNAME"]),
            wigal_api_url: first_of(&["WIGAL_API_URL", "FROG_SMS_API_URL"])
                .unwrap_or_else(|| wigal::DEFAULT_API_URL.to_string()),
            wigal_sender_id: first_of(&["WIGAL_SENDER_ID", "FROG_SMS_SENDER_ID"])
                .unwrap_or_else(|| wigal::DEFAULT_SENDER_ID.to_string()),
            jwt_secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "hostelhq".to_string()),
            admin_phone_numbers: split_list(lookup("ADMIN_PHONE_NUMBERS")),
            allowed_origins: split_list(lookup("ALLOWED_ORIGINS")),
            rate_limit_enabled: lookup("RATE_LIMIT_ENABLED")
                .map(|v| is_truthy(Some(&v)))
                .unwrap_or(true),
        })
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
