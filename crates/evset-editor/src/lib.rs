//! Local editing and server reconciliation of event conditions.
//!
//! [`store::DraftStore`] keeps the editable draft next to the last synced
//! snapshot, [`validation`] checks the draft row by row, and
//! [`sync::SyncController`] pushes the draft to an [`EventSettingsApi`].

pub mod error;
pub mod store;
pub mod sync;
pub mod validation;


use anyhow::Result;
use async_trait::async_trait;
use evset_common::types::{Condition, EventSettingGroup};
use std::sync::Arc;

/// Remote store of event conditions (`/event-settings`).
///
/// The HTTP implementation lives in `evset-client`; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait EventSettingsApi: Send + Sync {
    /// Lists every persisted group (`GET /event-settings`).
    async fn list(&self) -> Result<Vec<EventSettingGroup>>;

    /// Persists a new condition and returns its server-assigned id
    /// (`POST /event-settings`).
    async fn create(&self, condition: &Condition) -> Result<i64>;

    /// Overwrites an existing condition (`PATCH /event-settings/{id}`).
    async fn update(&self, id: i64, condition: &Condition) -> Result<()>;

    /// Deletes a condition (`DELETE /event-settings/{id}`).
    async fn delete(&self, id: i64) -> Result<()>;
}

#[async_trait]
impl<T: EventSettingsApi + ?Sized> EventSettingsApi for Arc<T> {
    async fn list(&self) -> Result<Vec<EventSettingGroup>> {
        (**self).list().await
    }

    async fn create(&self, condition: &Condition) -> Result<i64> {
        (**self).create(condition).await
    }

    async fn update(&self, id: i64, condition: &Condition) -> Result<()> {
        (**self).update(id, condition).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        (**self).delete(id).await
    }
}
