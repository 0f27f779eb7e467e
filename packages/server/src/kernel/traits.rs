// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. The matching
// rules live in domains/matching/engine.rs; these traits are the seams the
// pipeline's effects flow through so tests can swap in mocks.
//
// Naming convention: Base* for trait names.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domains::matching::models::Notification;

// =============================================================================
// Notification Store Trait (Infrastructure)
// =============================================================================

/// Durable, pair-deduplicated notification persistence.
#[async_trait]
pub trait BaseNotificationStore: Send + Sync {
    /// Create the notification for (company_id, applicant_id) unless the pair
    /// already has one. Returns whether this call created the row, plus the
    /// effective row either way. Must be atomic under concurrent duplicate
    /// deliveries - uniqueness is decided by the storage layer, not by a
    /// read-then-write.
    async fn upsert_if_absent(
        &self,
        company_id: Uuid,
        applicant_id: Uuid,
        applicant_name: &str,
    ) -> Result<(bool, Notification)>;

    /// All notifications for a company, most recent first.
    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Notification>>;

    /// Mark a notification read. Returns false for an unknown id.
    async fn mark_read(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// Real-time Push Trait (Infrastructure)
// =============================================================================

/// Best-effort delivery of a notification to connected company clients.
///
/// Callers treat failures as log-and-continue: the persisted notification is
/// the source of truth and remains retrievable via the read API.
#[async_trait]
pub trait BaseCompanyPush: Send + Sync {
    /// Push to the company's own real-time channel.
    async fn push_to_company(&self, company_id: Uuid, notification: &Notification)
        -> Result<()>;

    /// Push to the shared broadcast channel (secondary, non-authoritative).
    async fn broadcast(&self, notification: &Notification) -> Result<()>;
}
