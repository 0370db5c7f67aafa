//! Admin maintenance of OTP tracking records

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::common::{AppError, PhoneNumber};
use crate::domains::auth::types::OtpRecordSummary;
use crate::kernel::ServerDeps;

/// List records newest first.
///
/// A phone filter matches every stored alias of the number, so records
/// written in an older format still show up.
pub async fn list_otp_records(
    phone_filter: Option<&str>,
    deps: &ServerDeps,
) -> Result<Vec<OtpRecordSummary>, AppError> {
    let search_set = phone_filter
        .filter(|p| !p.trim().is_empty())
        .map(|p| PhoneNumber::parse(p).search_set());

    let now = Utc::now();
    let records = deps.otp_store.list(search_set.as_deref()).await?;

    Ok(records
        .into_iter()
        .map(|record| OtpRecordSummary {
            expired: record.is_expired(now),
            record,
        })
        .collect())
}

pub async fn delete_otp_record(id: Uuid, deps: &ServerDeps) -> Result<(), AppError> {
    if !deps.otp_store.delete(id).await? {
        return Err(AppError::NotFound(format!("OTP record {} not found", id)));
    }

    info!(record_id = %id, "OTP record deleted");
    Ok(())
}

pub async fn delete_otp_records(ids: &[Uuid], deps: &ServerDeps) -> Result<u64, AppError> {
    if ids.is_empty() {
        return Err(AppError::validation(
            "Please select at least one record to delete",
        ));
    }

    let deleted = deps.otp_store.delete_many(ids).await?;
    info!(requested = ids.len(), deleted, "OTP records deleted");
    Ok(deleted)
}

/// Delete every record whose expiry has passed, verified or not
pub async fn purge_expired_otp_records(deps: &ServerDeps) -> Result<u64, AppError> {
    let deleted = deps.otp_store.delete_expired(Utc::now()).await?;
    info!(deleted, "Expired OTP records purged");
    Ok(deleted)
}
