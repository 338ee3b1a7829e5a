use crate::error::{Result, SyncError};
use crate::store::DraftStore;
use crate::EventSettingsApi;
use evset_common::profile::FieldProfiles;

/// Rows pushed by a successful [`SyncController::save_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub created: usize,
    pub updated: usize,
}

/// Drives one editing session against the event-settings API.
///
/// Every operation takes `&mut self`, so two saves can never overlap on the
/// same controller. Dropping an in-flight future leaves the store as it was
/// after the last completed API call.
pub struct SyncController<A> {
    api: A,
    store: DraftStore,
}

impl<A: EventSettingsApi> SyncController<A> {
    pub fn new(api: A, profiles: FieldProfiles) -> Self {
        Self {
            api,
            store: DraftStore::new(profiles),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    /// Local edits (`update`, `add_new`, `remove`, `validate`) go through
    /// the store directly.
    pub fn store_mut(&mut self) -> &mut DraftStore {
        &mut self.store
    }

    /// Fetches all groups and loads the conditions of `profile_type`.
    /// Returns the number of loaded rows.
    pub async fn load(&mut self, profile_type: &str) -> Result<usize> {
        let groups = match self.api.list().await {
            Ok(groups) => groups,
            Err(e) => return Err(self.fail("list", &e)),
        };
        let conditions: Vec<_> = groups
            .into_iter()
            .filter(|g| g.profile_type == profile_type)
            .flat_map(|g| g.conditions)
            .collect();
        let count = conditions.len();
        self.store.load(conditions);
        tracing::info!(profile_type, count, "Event settings loaded");
        Ok(count)
    }

    /// Creates unsaved rows and updates changed persisted rows, in draft
    /// order.
    ///
    /// Stops at the first failing call. Ids returned by creates that already
    /// succeeded stay in the draft and the session stays dirty; there is no
    /// rollback. Untouched placeholder rows are not sent; on success they are
    /// dropped so the new snapshot only holds rows the server knows.
    pub async fn save_all(&mut self) -> Result<SaveSummary> {
        let mut summary = SaveSummary::default();

        for index in 0..self.store.draft().len() {
            let row = self.store.draft()[index].clone();
            if row.is_blank_placeholder() {
                continue;
            }
            match row.id {
                None => match self.api.create(&row).await {
                    Ok(id) => {
                        self.store.assign_id(index, id);
                        summary.created += 1;
                    }
                    Err(e) => return Err(self.fail("create", &e)),
                },
                Some(id) => {
                    let unchanged = self
                        .store
                        .original()
                        .iter()
                        .any(|o| o.id == Some(id) && *o == row);
                    if unchanged {
                        continue;
                    }
                    if let Err(e) = self.api.update(id, &row).await {
                        return Err(self.fail("update", &e));
                    }
                    summary.updated += 1;
                }
            }
        }

        self.store.drop_placeholders();
        self.store.clear_after_save();
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            "Event settings saved"
        );
        Ok(summary)
    }

    /// Deletes a persisted row right away. Not part of the draft cycle, so
    /// cancelling afterwards does not bring it back.
    pub async fn delete_one(&mut self, id: i64) -> Result<()> {
        if let Err(e) = self.api.delete(id).await {
            return Err(self.fail("delete", &e));
        }
        self.store.forget_persisted(id);
        tracing::info!(id, "Event setting deleted");
        Ok(())
    }

    pub fn cancel_all(&mut self) {
        self.store.reset_to_original();
    }

    fn fail(&mut self, operation: &'static str, err: &anyhow::Error) -> SyncError {
        let err = SyncError::api(operation, err);
        tracing::warn!(operation, error = %err, "Event settings request failed");
        self.store.set_api_error(err.message().to_string());
        err
    }
}
