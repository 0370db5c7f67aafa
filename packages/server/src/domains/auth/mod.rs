//! Auth domain - proves control of a phone number via OTP
//!
//! Responsibilities:
//! - Issuing OTPs through the SMS provider (or the fixed dev code)
//! - Verifying codes and tracking issuance records
//! - Verification tokens (JWT) for the verified number
//! - Admin maintenance of tracking records

pub mod activities;
pub mod jwt;
pub mod models;
pub mod types;

pub use jwt::{Claims, JwtService};
pub use types::{OtpRecordSummary, OtpSent, OtpVerified, DEV_OTP_CODE};
