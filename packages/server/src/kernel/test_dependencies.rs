// TestDependencies - mock implementations for testing
//
// Provides an in-memory OTP store and a scriptable SMS provider that can be
// injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wigal::{OtpOptions, WigalError};

use super::{BaseOtpStore, BaseSmsProvider, ServerDeps};
use crate::config::OtpMode;
use crate::domains::auth::models::{NewOtpVerification, OtpVerification};
use crate::domains::auth::JwtService;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

// =============================================================================
// In-memory OTP store
// =============================================================================

#[derive(Default)]
pub struct InMemoryOtpStore {
    records: Mutex<Vec<OtpVerification>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the pending-replacement rule
    pub fn insert(&self, record: OtpVerification) {
        self.records.lock().unwrap().push(record);
    }

    /// Snapshot of every stored record
    pub fn records(&self) -> Vec<OtpVerification> {
        self.records.lock().unwrap().clone()
    }

    pub fn records_for(&self, phone_number: &str) -> Vec<OtpVerification> {
        self.records()
            .into_iter()
            .filter(|r| r.phone_number == phone_number)
            .collect()
    }

    pub fn pending_for(&self, phone_number: &str) -> Vec<OtpVerification> {
        self.records_for(phone_number)
            .into_iter()
            .filter(OtpVerification::is_pending)
            .collect()
    }
}

#[async_trait]
impl BaseOtpStore for InMemoryOtpStore {
    async fn replace_pending(&self, record: NewOtpVerification) -> Result<OtpVerification> {
        let mut records = self.records.lock().unwrap();
        records.retain(|r| !(r.phone_number == record.phone_number && r.is_pending()));

        let stored = record.into_record(Uuid::now_v7());
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_latest_pending(&self, phone_number: &str) -> Result<Option<OtpVerification>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| r.phone_number == phone_number && r.is_pending())
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<Option<OtpVerification>> {
        let mut records = self.records.lock().unwrap();
        Ok(records
            .iter_mut()
            .find(|r| r.id == id && r.is_pending())
            .map(|r| {
                r.verified = true;
                r.verified_at = Some(Utc::now());
                r.clone()
            }))
    }

    async fn list(&self, phone_numbers: Option<&[String]>) -> Result<Vec<OtpVerification>> {
        let mut matching: Vec<OtpVerification> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| phone_numbers.map_or(true, |phones| phones.contains(&r.phone_number)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !ids.contains(&r.id));
        Ok((before - records.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !r.is_expired(now));
        Ok((before - records.len()) as u64)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Mock SMS provider
// =============================================================================

/// Failure the mock provider reproduces on send
#[derive(Debug, Clone)]
pub enum MockSmsFailure {
    Authentication,
    Rejected(String),
    /// Upstream outage answered with this HTTP status and no message
    Unavailable(u16),
}

impl MockSmsFailure {
    fn to_error(&self) -> WigalError {
        match self {
            MockSmsFailure::Authentication => WigalError::Authentication,
            MockSmsFailure::Rejected(message) => WigalError::Rejected {
                status: 400,
                message: message.clone(),
            },
            MockSmsFailure::Unavailable(status) => WigalError::Rejected {
                status: *status,
                message: format!("HTTP {}", status),
            },
        }
    }
}

/// Scriptable stand-in for the Wigal API.
///
/// Verification only succeeds for the code set with `accepting_code`.
#[derive(Default)]
pub struct MockSmsProvider {
    accepted_code: Option<String>,
    send_failure: Option<MockSmsFailure>,
    verify_failure: Option<MockSmsFailure>,
    sent_otps: Mutex<Vec<(String, OtpOptions)>>,
    verify_calls: Mutex<Vec<(String, String)>>,
    sent_messages: Mutex<Vec<(String, String)>>,
}

impl MockSmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepting_code(mut self, code: impl Into<String>) -> Self {
        self.accepted_code = Some(code.into());
        self
    }

    pub fn failing_with(mut self, failure: MockSmsFailure) -> Self {
        self.send_failure = Some(failure);
        self
    }

    /// Make every verification fail this way, whatever the code
    pub fn failing_verify_with(mut self, failure: MockSmsFailure) -> Self {
        self.verify_failure = Some(failure);
        self
    }

    /// Phone numbers OTPs were requested for, in order
    pub fn sent_otps(&self) -> Vec<String> {
        self.sent_otps
            .lock()
            .unwrap()
            .iter()
            .map(|(phone, _)| phone.clone())
            .collect()
    }

    pub fn last_otp_options(&self) -> Option<OtpOptions> {
        self.sent_otps
            .lock()
            .unwrap()
            .last()
            .map(|(_, options)| options.clone())
    }

    pub fn verify_calls(&self) -> Vec<(String, String)> {
        self.verify_calls.lock().unwrap().clone()
    }

    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent_messages.lock().unwrap().clone()
    }

    /// Total number of calls made to the provider
    pub fn call_count(&self) -> usize {
        self.sent_otps.lock().unwrap().len()
            + self.verify_calls.lock().unwrap().len()
            + self.sent_messages.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseSmsProvider for MockSmsProvider {
    async fn send_otp(&self, phone_number: &str, options: &OtpOptions) -> Result<(), WigalError> {
        self.sent_otps
            .lock()
            .unwrap()
            .push((phone_number.to_string(), options.clone()));

        match &self.send_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), WigalError> {
        self.verify_calls
            .lock()
            .unwrap()
            .push((phone_number.to_string(), code.to_string()));

        if let Some(failure) = &self.verify_failure {
            return Err(failure.to_error());
        }

        match &self.accepted_code {
            Some(accepted) if accepted == code => Ok(()),
            _ => Err(WigalError::Rejected {
                status: 400,
                message: "Invalid or expired OTP".to_string(),
            }),
        }
    }

    async fn send_sms(&self, phone_number: &str, message: &str) -> Result<(), WigalError> {
        self.sent_messages
            .lock()
            .unwrap()
            .push((phone_number.to_string(), message.to_string()));

        match &self.send_failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub otp_store: Arc<InMemoryOtpStore>,
    pub sms_provider: Option<Arc<MockSmsProvider>>,
    pub admin_phone_numbers: Vec<String>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            otp_store: Arc::new(InMemoryOtpStore::new()),
            sms_provider: Some(Arc::new(MockSmsProvider::new())),
            admin_phone_numbers: Vec::new(),
        }
    }

    /// Set a mock SMS provider
    pub fn mock_sms(mut self, provider: MockSmsProvider) -> Self {
        self.sms_provider = Some(Arc::new(provider));
        self
    }

    /// Simulate missing provider credentials
    pub fn without_sms_provider(mut self) -> Self {
        self.sms_provider = None;
        self
    }

    pub fn admin_phone_numbers(mut self, phones: &[&str]) -> Self {
        self.admin_phone_numbers = phones.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn jwt_service() -> JwtService {
        JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())
    }

    /// The mock provider; panics if it was removed with `without_sms_provider`
    pub fn sms(&self) -> &MockSmsProvider {
        self.sms_provider
            .as_deref()
            .expect("test dependencies have no SMS provider")
    }

    /// Convert into ServerDeps for testing
    pub fn into_server_deps(&self, otp_mode: OtpMode) -> ServerDeps {
        let sms_provider: Result<Arc<dyn BaseSmsProvider>, Vec<&'static str>> =
            match &self.sms_provider {
                Some(provider) => Ok(provider.clone()),
                None => Err(vec!["WIGAL_API_KEY", "WIGAL_USERNAME"]),
            };

        ServerDeps::new(
            self.otp_store.clone(),
            sms_provider,
            otp_mode,
            Arc::new(Self::jwt_service()),
            self.admin_phone_numbers.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
