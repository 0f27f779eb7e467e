//! Notification record - the durable, deduplicated result of a match.
//!
//! At most one row exists per (company_id, applicant_id) pair, enforced by a
//! database UNIQUE constraint rather than application-level read-then-write.
//! Duplicate match events are expected under at-least-once delivery and must
//! collapse onto the first persisted row.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A persisted notification for a company about one matching applicant.
///
/// Serialized camelCase on every outward surface (read API, SSE push).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub company_id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// User-visible message for a fresh match.
    pub fn match_message(applicant_name: &str) -> String {
        format!("New applicant {} matches your search profile", applicant_name)
    }

    /// Insert the notification for (company_id, applicant_id) if the pair has
    /// no row yet. Returns `(true, row)` when this call created the row and
    /// `(false, row)` when an earlier delivery already won.
    ///
    /// ON CONFLICT DO NOTHING makes the uniqueness decision inside the
    /// database, so concurrent duplicate deliveries cannot both create.
    pub async fn upsert_if_absent(
        company_id: Uuid,
        applicant_id: Uuid,
        applicant_name: &str,
        pool: &PgPool,
    ) -> Result<(bool, Self)> {
        let inserted = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (company_id, applicant_id, applicant_name, message)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (company_id, applicant_id) DO NOTHING
             RETURNING *",
        )
        .bind(company_id)
        .bind(applicant_id)
        .bind(applicant_name)
        .bind(Self::match_message(applicant_name))
        .fetch_optional(pool)
        .await?;

        if let Some(notification) = inserted {
            return Ok((true, notification));
        }

        // The pair already has a row; read the committed winner.
        let existing = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE company_id = $1 AND applicant_id = $2",
        )
        .bind(company_id)
        .bind(applicant_id)
        .fetch_one(pool)
        .await?;

        Ok((false, existing))
    }

    /// All notifications for a company, most recent first.
    pub async fn find_by_company(company_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Mark a notification as read. Returns false if the id is unknown.
    pub async fn mark_read(id: Uuid, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Postgres-backed implementation of the notification store seam.
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl crate::kernel::traits::BaseNotificationStore for PgNotificationStore {
    async fn upsert_if_absent(
        &self,
        company_id: Uuid,
        applicant_id: Uuid,
        applicant_name: &str,
    ) -> Result<(bool, Notification)> {
        Notification::upsert_if_absent(company_id, applicant_id, applicant_name, &self.pool)
            .await
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Notification>> {
        Notification::find_by_company(company_id, &self.pool).await
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool> {
        Notification::mark_read(id, &self.pool).await
    }
}
