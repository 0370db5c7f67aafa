use thiserror::Error;
use wigal::WigalError;

/// Every failure a request can end in.
///
/// Each variant maps to exactly one HTTP status in `server::error`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Configuration {
        message: String,
        hint: Option<String>,
    },

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("{0}")]
    InvalidCode(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Map an SMS provider failure that happened while sending.
    pub fn from_provider(err: WigalError) -> Self {
        match err {
            WigalError::MissingCredentials { missing } => AppError::Configuration {
                message: "Wigal API credentials are not configured.".to_string(),
                hint: Some(format!("Missing: {}", missing.join(" "))),
            },
            WigalError::Authentication => AppError::Provider {
                status: 401,
                message: WigalError::Authentication.to_string(),
            },
            WigalError::Rejected { message, .. } => AppError::Provider {
                status: 500,
                message,
            },
            WigalError::InvalidResponse(_) => AppError::Provider {
                status: 500,
                message: "SMS service returned an error. Please verify your Wigal API credentials are correct."
                    .to_string(),
            },
            WigalError::Http(_) => AppError::Provider {
                status: 500,
                message: "Network error while contacting the SMS service. Please try again."
                    .to_string(),
            },
        }
    }
}
