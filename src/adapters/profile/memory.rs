//! In-memory profile store for testing.
//!
//! Implements the `ProfileStore` port over hash maps with the same error
//! taxonomy a real backend produces: duplicate inserts collide on the
//! user-id key, and switches simulate row-level permission rejection and a
//! backend that never answers (for watchdog tests).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::foundation::{Role, StoreError, Timestamp, UserId};
use crate::domain::profile::{BrandProfile, CoreProfileRecord, CreatorProfile};
use crate::ports::ProfileStore;

/// In-memory `ProfileStore`.
#[derive(Default)]
pub struct InMemoryProfileStore {
    cores: RwLock<HashMap<Uuid, CoreProfileRecord>>,
    creators: RwLock<HashMap<Uuid, CreatorProfile>>,
    brands: RwLock<HashMap<Uuid, BrandProfile>>,
    /// Every call fails with `PermissionDenied` while set.
    deny_permission: AtomicBool,
    /// `find_core` never resolves while set.
    hang_reads: AtomicBool,
    /// Reads resolve only after this delay, when set.
    read_delay: RwLock<Option<std::time::Duration>>,
    insert_core_calls: AtomicUsize,
}

impl InMemoryProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a core row.
    pub fn with_core(self, record: CoreProfileRecord) -> Self {
        self.cores
            .write()
            .unwrap()
            .insert(*record.user_id.as_uuid(), record);
        self
    }

    /// Seeds a creator extension row.
    pub fn with_creator(self, profile: CreatorProfile) -> Self {
        self.creators
            .write()
            .unwrap()
            .insert(*profile.user_id.as_uuid(), profile);
        self
    }

    /// Seeds a brand extension row.
    pub fn with_brand(self, profile: BrandProfile) -> Self {
        self.brands
            .write()
            .unwrap()
            .insert(*profile.user_id.as_uuid(), profile);
        self
    }

    /// Simulates row-level authorization rejecting every call.
    pub fn set_permission_denied(&self, denied: bool) {
        self.deny_permission.store(denied, Ordering::SeqCst);
    }

    /// Simulates a backend that hangs on reads.
    pub fn set_hang_reads(&self, hang: bool) {
        self.hang_reads.store(hang, Ordering::SeqCst);
    }

    /// Simulates a slow backend: reads resolve after `delay`.
    pub fn set_read_delay(&self, delay: Option<std::time::Duration>) {
        *self.read_delay.write().unwrap() = delay;
    }

    /// Number of `insert_core` attempts, including colliding ones.
    pub fn insert_core_calls(&self) -> usize {
        self.insert_core_calls.load(Ordering::SeqCst)
    }

    /// Number of core rows currently stored.
    pub fn core_row_count(&self) -> usize {
        self.cores.read().unwrap().len()
    }

    fn check_permission(&self) -> Result<(), StoreError> {
        if self.deny_permission.load(Ordering::SeqCst) {
            Err(StoreError::PermissionDenied)
        } else {
            Ok(())
        }
    }

    async fn maybe_hang(&self) {
        if self.hang_reads.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let delay = *self.read_delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_core(&self, user_id: &UserId) -> Result<Option<CoreProfileRecord>, StoreError> {
        self.maybe_hang().await;
        self.check_permission()?;
        Ok(self.cores.read().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn insert_core(&self, record: &CoreProfileRecord) -> Result<(), StoreError> {
        self.insert_core_calls.fetch_add(1, Ordering::SeqCst);
        self.check_permission()?;
        let mut cores = self.cores.write().unwrap();
        if cores.contains_key(record.user_id.as_uuid()) {
            return Err(StoreError::UniqueViolation);
        }
        cores.insert(*record.user_id.as_uuid(), record.clone());
        Ok(())
    }

    async fn set_role(&self, user_id: &UserId, role: Role) -> Result<(), StoreError> {
        self.check_permission()?;
        let mut cores = self.cores.write().unwrap();
        let record = cores
            .get_mut(user_id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        if record.role.is_some() {
            return Err(StoreError::backend("role already set"));
        }
        record.role = Some(role.as_str().to_string());
        record.updated_at = Timestamp::now();
        Ok(())
    }

    async fn complete_onboarding(&self, user_id: &UserId) -> Result<(), StoreError> {
        self.check_permission()?;
        let mut cores = self.cores.write().unwrap();
        let record = cores
            .get_mut(user_id.as_uuid())
            .ok_or(StoreError::NotFound)?;
        record.onboarding_completed = true;
        record.updated_at = Timestamp::now();
        Ok(())
    }

    async fn find_creator(&self, user_id: &UserId) -> Result<Option<CreatorProfile>, StoreError> {
        self.maybe_hang().await;
        self.check_permission()?;
        Ok(self.creators.read().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn find_brand(&self, user_id: &UserId) -> Result<Option<BrandProfile>, StoreError> {
        self.maybe_hang().await;
        self.check_permission()?;
        Ok(self.brands.read().unwrap().get(user_id.as_uuid()).cloned())
    }

    async fn insert_creator(&self, profile: &CreatorProfile) -> Result<(), StoreError> {
        self.check_permission()?;
        let mut creators = self.creators.write().unwrap();
        if creators.contains_key(profile.user_id.as_uuid()) {
            return Err(StoreError::UniqueViolation);
        }
        creators.insert(*profile.user_id.as_uuid(), profile.clone());
        Ok(())
    }

    async fn insert_brand(&self, profile: &BrandProfile) -> Result<(), StoreError> {
        self.check_permission()?;
        let mut brands = self.brands.write().unwrap();
        if brands.contains_key(profile.user_id.as_uuid()) {
            return Err(StoreError::UniqueViolation);
        }
        brands.insert(*profile.user_id.as_uuid(), profile.clone());
        Ok(())
    }
}
