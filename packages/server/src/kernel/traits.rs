// Infrastructure traits
//
// Storage and the SMS provider sit behind these so domain activities can run
// against Postgres + Wigal in production and in-memory fakes in tests.
//
// Naming convention: Base* for trait names (e.g., BaseOtpStore, BaseSmsProvider)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use wigal::{OtpOptions, WigalError};

use crate::domains::auth::models::{NewOtpVerification, OtpVerification};

// =============================================================================
// OTP Store Trait (Infrastructure - persistence)
// =============================================================================

#[async_trait]
pub trait BaseOtpStore: Send + Sync {
    /// Atomically replace the pending record for `record.phone_number`
    async fn replace_pending(&self, record: NewOtpVerification) -> Result<OtpVerification>;

    async fn find_latest_pending(&self, phone_number: &str) -> Result<Option<OtpVerification>>;

    /// Mark a pending record verified; `None` if it is gone or already verified
    async fn mark_verified(&self, id: Uuid) -> Result<Option<OtpVerification>>;

    /// Newest first. `phone_numbers` restricts the result to those numbers.
    async fn list(&self, phone_numbers: Option<&[String]>) -> Result<Vec<OtpVerification>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64>;

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    async fn health_check(&self) -> Result<()>;
}

// =============================================================================
// SMS Provider Trait (Infrastructure - SMS/OTP)
// =============================================================================

#[async_trait]
pub trait BaseSmsProvider: Send + Sync {
    /// Have the provider generate an OTP and text it to the phone number
    async fn send_otp(&self, phone_number: &str, options: &OtpOptions) -> Result<(), WigalError>;

    /// Check a code against the provider's pending OTP for the phone number
    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), WigalError>;

    /// Send a plain text message
    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), WigalError>;
}
