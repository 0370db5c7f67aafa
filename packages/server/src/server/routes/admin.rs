use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::AppError;
use crate::domains::auth::activities::{
    delete_otp_record, delete_otp_records, list_otp_records, purge_expired_otp_records,
};
use crate::domains::auth::OtpRecordSummary;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ListOtpQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListOtpResponse {
    pub success: bool,
    pub count: usize,
    pub records: Vec<OtpRecordSummary>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

/// GET /admin/otp?phone=
pub async fn list_otp_records_handler(
    Extension(state): Extension<AppState>,
    query: Result<Query<ListOtpQuery>, QueryRejection>,
) -> Result<Json<ListOtpResponse>, AppError> {
    let Query(query) = query?;
    let records = list_otp_records(query.phone.as_deref(), &state.deps).await?;

    Ok(Json(ListOtpResponse {
        success: true,
        count: records.len(),
        records,
    }))
}

/// DELETE /admin/otp/:id
pub async fn delete_otp_record_handler(
    Extension(state): Extension<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Path(id) = id?;
    delete_otp_record(id, &state.deps).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted: 1,
    }))
}

/// POST /admin/otp/delete
pub async fn delete_otp_records_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Json(request) = payload?;
    let deleted = delete_otp_records(&request.ids, &state.deps).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}

/// POST /admin/otp/purge-expired
pub async fn purge_expired_otp_records_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = purge_expired_otp_records(&state.deps).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted,
    }))
}
