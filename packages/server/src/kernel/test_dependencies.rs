// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.
// The store mock keeps the same pair-keyed create-if-absent semantics the
// Postgres table enforces with its UNIQUE constraint.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domains::directory::{BaseProfileDirectory, DirectoryError};
use crate::domains::matching::models::{CompanySearchProfile, Notification};

use super::deps::ServerDeps;
use super::nats::TestNats;
use super::stream_hub::StreamHub;
use super::traits::{BaseCompanyPush, BaseNotificationStore};

// =============================================================================
// In-memory Notification Store
// =============================================================================

/// Pair-keyed store over a mutex-guarded map. The mutex makes upserts atomic
/// under concurrent duplicate deliveries, mirroring the DB constraint.
#[derive(Default)]
pub struct InMemoryNotificationStore {
    rows: Mutex<HashMap<(Uuid, Uuid), Notification>>,
    fail: AtomicBool,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every store call fail until reset (simulates storage outage).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, company_id: Uuid, applicant_id: Uuid) -> Option<Notification> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(company_id, applicant_id))
            .cloned()
    }
}

#[async_trait]
impl BaseNotificationStore for InMemoryNotificationStore {
    async fn upsert_if_absent(
        &self,
        company_id: Uuid,
        applicant_id: Uuid,
        applicant_name: &str,
    ) -> Result<(bool, Notification)> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected store failure");
        }

        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = rows.get(&(company_id, applicant_id)) {
            return Ok((false, existing.clone()));
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            company_id,
            applicant_id,
            applicant_name: applicant_name.to_string(),
            message: Notification::match_message(applicant_name),
            read: false,
            created_at: Utc::now(),
        };
        rows.insert((company_id, applicant_id), notification.clone());

        Ok((true, notification))
    }

    async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<Notification>> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected store failure");
        }

        let mut notifications: Vec<Notification> = self
            .rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|n| n.company_id == company_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected store failure");
        }

        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        for notification in rows.values_mut() {
            if notification.id == id {
                notification.read = true;
                return Ok(true);
            }
        }

        Ok(false)
    }
}

// =============================================================================
// Mock Profile Directory
// =============================================================================

enum DirectoryFailure {
    Timeout,
    Unavailable,
}

/// Directory mock with configurable profiles and injectable outages.
#[derive(Default)]
pub struct MockProfileDirectory {
    profiles: Mutex<Vec<CompanySearchProfile>>,
    failure: Mutex<Option<DirectoryFailure>>,
    calls: AtomicUsize,
}

impl MockProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: Vec<CompanySearchProfile>) -> Self {
        let directory = Self::new();
        directory.set_profiles(profiles);
        directory
    }

    pub fn set_profiles(&self, profiles: Vec<CompanySearchProfile>) {
        *self.profiles.lock().unwrap_or_else(|e| e.into_inner()) = profiles;
    }

    /// Subsequent lookups fail as a timeout.
    pub fn fail_with_timeout(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(DirectoryFailure::Timeout);
    }

    /// Subsequent lookups fail as unreachable.
    pub fn fail_with_unavailable(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) =
            Some(DirectoryFailure::Unavailable);
    }

    /// Clear any injected failure.
    pub fn succeed(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BaseProfileDirectory for MockProfileDirectory {
    async fn get_all_search_profiles(
        &self,
    ) -> Result<Vec<CompanySearchProfile>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &*self.failure.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(DirectoryFailure::Timeout) => Err(DirectoryError::Timeout),
            Some(DirectoryFailure::Unavailable) => {
                Err(DirectoryError::Unavailable("connection refused".to_string()))
            }
            None => Ok(self
                .profiles
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone()),
        }
    }
}

// =============================================================================
// Mock Company Push
// =============================================================================

/// Push mock recording per-company and broadcast deliveries.
#[derive(Default)]
pub struct MockCompanyPush {
    pushes: Mutex<Vec<(Uuid, Notification)>>,
    broadcasts: Mutex<Vec<Notification>>,
    fail: AtomicBool,
}

impl MockCompanyPush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every push fail until reset (push is best-effort; the sink must
    /// swallow these).
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn pushes(&self) -> Vec<(Uuid, Notification)> {
        self.pushes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn broadcast_count(&self) -> usize {
        self.broadcasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[async_trait]
impl BaseCompanyPush for MockCompanyPush {
    async fn push_to_company(
        &self,
        company_id: Uuid,
        notification: &Notification,
    ) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected push failure");
        }

        self.pushes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((company_id, notification.clone()));
        Ok(())
    }

    async fn broadcast(&self, notification: &Notification) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("injected push failure");
        }

        self.broadcasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        Ok(())
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// All mocks plus a [`ServerDeps`] view over them, for pipeline tests.
pub struct TestDeps {
    pub nats: Arc<TestNats>,
    pub store: Arc<InMemoryNotificationStore>,
    pub directory: Arc<MockProfileDirectory>,
    pub push: Arc<MockCompanyPush>,
    pub stream_hub: StreamHub,
}

impl TestDeps {
    pub fn new() -> Self {
        Self {
            nats: Arc::new(TestNats::new()),
            store: Arc::new(InMemoryNotificationStore::new()),
            directory: Arc::new(MockProfileDirectory::new()),
            push: Arc::new(MockCompanyPush::new()),
            stream_hub: StreamHub::new(),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.store.clone(),
            self.directory.clone(),
            self.nats.clone(),
            self.push.clone(),
            self.stream_hub.clone(),
        )
    }
}

impl Default for TestDeps {
    fn default() -> Self {
        Self::new()
    }
}
