//! Server dependencies for activities (using traits for testability)
//!
//! This module provides the central dependency container used by the domain
//! activities. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use wigal::{OtpOptions, WigalError, WigalService};

use crate::common::AppError;
use crate::config::OtpMode;
use crate::domains::auth::models::{NewOtpVerification, OtpVerification};
use crate::domains::auth::JwtService;
use crate::kernel::{BaseOtpStore, BaseSmsProvider};

// =============================================================================
// WigalService Adapter (implements BaseSmsProvider trait)
// =============================================================================

/// Wrapper around WigalService that implements BaseSmsProvider trait
pub struct WigalAdapter(pub Arc<WigalService>);

impl WigalAdapter {
    pub fn new(service: Arc<WigalService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsProvider for WigalAdapter {
    async fn send_otp(&self, phone_number: &str, options: &OtpOptions) -> Result<(), WigalError> {
        self.0.generate_otp(phone_number, options).await.map(|_| ())
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), WigalError> {
        self.0.verify_otp(phone_number, code).await.map(|_| ())
    }

    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), WigalError> {
        let msg_id = format!("MSG{}", Uuid::new_v4().simple());
        self.0
            .send_sms(phone_number, message, &msg_id)
            .await
            .map(|_| ())
    }
}

// =============================================================================
// Postgres OTP store (implements BaseOtpStore trait)
// =============================================================================

pub struct PostgresOtpStore {
    pool: PgPool,
}

impl PostgresOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseOtpStore for PostgresOtpStore {
    async fn replace_pending(&self, record: NewOtpVerification) -> Result<OtpVerification> {
        OtpVerification::upsert_pending(record, &self.pool).await
    }

    async fn find_latest_pending(&self, phone_number: &str) -> Result<Option<OtpVerification>> {
        OtpVerification::find_latest_pending(phone_number, &self.pool).await
    }

    async fn mark_verified(&self, id: Uuid) -> Result<Option<OtpVerification>> {
        OtpVerification::mark_verified(id, &self.pool).await
    }

    async fn list(&self, phone_numbers: Option<&[String]>) -> Result<Vec<OtpVerification>> {
        OtpVerification::list(phone_numbers, &self.pool).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        OtpVerification::delete(id, &self.pool).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        OtpVerification::delete_many(ids, &self.pool).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        OtpVerification::delete_expired(now, &self.pool).await
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    pub otp_store: Arc<dyn BaseOtpStore>,
    /// `None` when provider credentials are not configured
    pub sms_provider: Option<Arc<dyn BaseSmsProvider>>,
    /// Names of the credential variables that are missing, for error hints
    pub missing_sms_credentials: Vec<&'static str>,
    pub otp_mode: OtpMode,
    pub jwt_service: Arc<JwtService>,
    pub admin_phone_numbers: Vec<String>,
}

impl ServerDeps {
    pub fn new(
        otp_store: Arc<dyn BaseOtpStore>,
        sms_provider: Result<Arc<dyn BaseSmsProvider>, Vec<&'static str>>,
        otp_mode: OtpMode,
        jwt_service: Arc<JwtService>,
        admin_phone_numbers: Vec<String>,
    ) -> Self {
        let (sms_provider, missing_sms_credentials) = match sms_provider {
            Ok(provider) => (Some(provider), Vec::new()),
            Err(missing) => (None, missing),
        };

        Self {
            otp_store,
            sms_provider,
            missing_sms_credentials,
            otp_mode,
            jwt_service,
            admin_phone_numbers,
        }
    }

    /// The configured SMS provider, or a configuration error naming what is missing
    pub fn sms_provider(&self) -> Result<&Arc<dyn BaseSmsProvider>, AppError> {
        self.sms_provider.as_ref().ok_or_else(|| AppError::Configuration {
            message: "Wigal API credentials are not configured. Please check your environment variables."
                .to_string(),
            hint: Some(format!(
                "Missing: {}",
                self.missing_sms_credentials.join(" ")
            )),
        })
    }
}
