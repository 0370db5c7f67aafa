use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Tracking record for one issued OTP.
///
/// In prod mode the code itself lives only at the SMS provider and `otp` is
/// `None`. Dev-mode records carry the fixed dev code.
///
/// At most one record per phone number is pending (`verified = false`); the
/// `otp_verifications_one_pending` index enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerification {
    pub id: Uuid,
    pub phone_number: String, // canonical local format
    pub otp: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub length: i32,
    pub is_dev: bool,
}

/// A record about to be issued
#[derive(Debug, Clone)]
pub struct NewOtpVerification {
    pub phone_number: String,
    pub otp: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub length: i32,
    pub is_dev: bool,
}

impl NewOtpVerification {
    pub fn into_record(self, id: Uuid) -> OtpVerification {
        OtpVerification {
            id,
            phone_number: self.phone_number,
            otp: self.otp,
            verified: false,
            created_at: self.created_at,
            expires_at: self.expires_at,
            verified_at: None,
            length: self.length,
            is_dev: self.is_dev,
        }
    }
}

impl OtpVerification {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_pending(&self) -> bool {
        !self.verified
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl OtpVerification {
    /// Issue a record, replacing the pending one for the same number.
    ///
    /// Single statement, so two concurrent issuances for one number can never
    /// leave zero or two pending rows behind.
    pub async fn upsert_pending(record: NewOtpVerification, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, OtpVerification>(
            r#"
            INSERT INTO otp_verifications
                (id, phone_number, otp, verified, created_at, expires_at, length, is_dev)
            VALUES ($1, $2, $3, FALSE, $4, $5, $6, $7)
            ON CONFLICT (phone_number) WHERE NOT verified
            DO UPDATE SET
                id = EXCLUDED.id,
                otp = EXCLUDED.otp,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at,
                length = EXCLUDED.length,
                is_dev = EXCLUDED.is_dev
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(record.phone_number)
        .bind(record.otp)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.length)
        .bind(record.is_dev)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    /// Most recent pending record for a canonical phone number
    pub async fn find_latest_pending(phone_number: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, OtpVerification>(
            r#"
            SELECT * FROM otp_verifications
            WHERE phone_number = $1 AND NOT verified
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(phone_number)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Mark one pending record verified. Returns `None` if it was already
    /// verified or no longer exists.
    pub async fn mark_verified(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, OtpVerification>(
            r#"
            UPDATE otp_verifications
            SET verified = TRUE, verified_at = NOW()
            WHERE id = $1 AND NOT verified
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// All records newest first, optionally restricted to a set of phone numbers
    pub async fn list(phone_numbers: Option<&[String]>, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, OtpVerification>(
            r#"
            SELECT * FROM otp_verifications
            WHERE ($1::text[] IS NULL OR phone_number = ANY($1))
            ORDER BY created_at DESC
            "#,
        )
        .bind(phone_numbers.map(<[String]>::to_vec))
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn delete(id: Uuid, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM otp_verifications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_many(ids: &[Uuid], pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM otp_verifications WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_expired(now: DateTime<Utc>, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM otp_verifications WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_record(expires_in: Duration) -> NewOtpVerification {
        let now = Utc::now();
        NewOtpVerification {
            phone_number: "0542709440".to_string(),
            otp: Some("123456".to_string()),
            created_at: now,
            expires_at: now + expires_in,
            length: 6,
            is_dev: true,
        }
    }

    #[test]
    fn test_into_record_starts_pending() {
        let id = Uuid::new_v4();
        let record = new_record(Duration::minutes(10)).into_record(id);

        assert_eq!(record.id, id);
        assert!(record.is_pending());
        assert!(record.verified_at.is_none());
        assert!(!record.is_expired(Utc::now()));
    }

    #[test]
    fn test_expiry_boundary() {
        let record = new_record(Duration::minutes(10)).into_record(Uuid::new_v4());

        assert!(record.is_expired(record.expires_at));
        assert!(!record.is_expired(record.expires_at - Duration::seconds(1)));
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = new_record(Duration::minutes(10)).into_record(Uuid::new_v4());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["phoneNumber"], "0542709440");
        assert_eq!(json["isDev"], true);
        assert!(json.get("expiresAt").is_some());
    }
}
