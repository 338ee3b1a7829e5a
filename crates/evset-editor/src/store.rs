use crate::validation::{self, ValidationReport};
use evset_common::profile::FieldProfiles;
use evset_common::sort::sort_conditions;
use evset_common::types::{Condition, ConditionType, Level, Operator, Threshold};

/// A single-field change applied by [`DraftStore::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionEdit {
    FieldKey(String),
    Level(Level),
    ConditionType(ConditionType),
    Operator(Operator),
    ThresholdValue(Option<f64>),
    LeftValue(Option<f64>),
    RightValue(Option<f64>),
    Activate(bool),
    NotificationEnabled(bool),
}

/// Editable list of conditions next to the snapshot last confirmed by the
/// server.
///
/// `original` changes only on [`load`](Self::load) and
/// [`clear_after_save`](Self::clear_after_save); every other mutator works
/// on `draft`. Both lists are owned, so editing the draft never aliases the
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    profiles: FieldProfiles,
    draft: Vec<Condition>,
    original: Vec<Condition>,
    dirty: bool,
    validation: ValidationReport,
    api_error: Option<String>,
}

impl DraftStore {
    pub fn new(profiles: FieldProfiles) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn profiles(&self) -> &FieldProfiles {
        &self.profiles
    }

    pub fn draft(&self) -> &[Condition] {
        &self.draft
    }

    pub fn original(&self) -> &[Condition] {
        &self.original
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Structural difference between draft and snapshot. Unlike
    /// [`is_dirty`](Self::is_dirty) this is false again when an edit is
    /// undone by hand.
    pub fn has_changes(&self) -> bool {
        self.draft != self.original
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn api_error(&self) -> Option<&str> {
        self.api_error.as_deref()
    }

    pub fn load(&mut self, mut conditions: Vec<Condition>) {
        sort_conditions(&mut conditions);
        self.draft = conditions.clone();
        self.original = conditions;
        self.clear_status();
    }

    /// Applies `edit` to `draft[index]`. Returns `false` without touching
    /// anything when the index is out of range, which happens when a stale
    /// handler refers to a row that was removed in the meantime.
    pub fn update(&mut self, index: usize, edit: ConditionEdit) -> bool {
        let Some(row) = self.draft.get_mut(index) else {
            tracing::debug!(index, "Ignoring update for missing draft row");
            return false;
        };
        apply_edit(row, edit, &self.profiles);
        self.dirty = true;
        true
    }

    /// Prepends a new unsaved row for `profile_type`.
    pub fn add_new(&mut self, profile_type: &str) {
        self.draft.insert(0, Condition::new_draft(profile_type));
        self.dirty = true;
    }

    /// Drops `draft[index]`. Persisted rows are removed through
    /// [`SyncController::delete_one`](crate::sync::SyncController::delete_one)
    /// instead; this is meant for rows that never reached the server.
    pub fn remove(&mut self, index: usize) -> Option<Condition> {
        if index >= self.draft.len() {
            return None;
        }
        self.dirty = true;
        Some(self.draft.remove(index))
    }

    pub fn reset_to_original(&mut self) {
        self.draft = self.original.clone();
        self.clear_status();
    }

    /// Promotes the draft to the new snapshot. Server-assigned ids must
    /// already be written into the draft.
    pub fn clear_after_save(&mut self) {
        self.original = self.draft.clone();
        self.clear_status();
    }

    pub fn reset(&mut self) {
        self.draft.clear();
        self.original.clear();
        self.clear_status();
    }

    /// Re-runs the validation pass over the draft and keeps the report.
    pub fn validate(&mut self) -> &ValidationReport {
        self.validation = validation::validate(&self.draft, &self.profiles);
        &self.validation
    }

    pub(crate) fn set_api_error(&mut self, message: String) {
        self.api_error = Some(message);
    }

    pub(crate) fn assign_id(&mut self, index: usize, id: i64) {
        if let Some(row) = self.draft.get_mut(index) {
            row.id = Some(id);
        }
    }

    pub(crate) fn drop_placeholders(&mut self) {
        self.draft.retain(|c| !c.is_blank_placeholder());
    }

    /// Removes a deleted row from both lists. The dirty flag is left alone:
    /// deletion happens outside the save/cancel cycle.
    pub(crate) fn forget_persisted(&mut self, id: i64) {
        self.draft.retain(|c| c.id != Some(id));
        self.original.retain(|c| c.id != Some(id));
    }

    fn clear_status(&mut self) {
        self.dirty = false;
        self.validation = ValidationReport::default();
        self.api_error = None;
    }
}

fn apply_edit(row: &mut Condition, edit: ConditionEdit, profiles: &FieldProfiles) {
    match edit {
        ConditionEdit::FieldKey(key) => {
            let was_boolean = profiles.is_boolean(&row.field_key);
            row.field_key = key;
            rederive_from_profile(row, profiles, was_boolean);
        }
        ConditionEdit::Level(level) => row.level = level,
        ConditionEdit::ConditionType(ct) => set_condition_type(row, ct, profiles),
        ConditionEdit::Operator(op) => set_operator(row, op, profiles),
        ConditionEdit::ThresholdValue(value) => {
            if let Threshold::Single {
                threshold_value, ..
            } = &mut row.threshold
            {
                *threshold_value = value;
            }
        }
        ConditionEdit::LeftValue(value) => {
            if let Threshold::Range { left_value, .. } = &mut row.threshold {
                *left_value = value;
            }
        }
        ConditionEdit::RightValue(value) => {
            if let Threshold::Range { right_value, .. } = &mut row.threshold {
                *right_value = value;
            }
        }
        ConditionEdit::Activate(on) => row.activate = on,
        ConditionEdit::NotificationEnabled(on) => row.notification_enabled = on,
    }
}

/// Merges the field's profile into the row after its key changed. Leaving a
/// boolean field drops its fixed operator in favour of the new default.
fn rederive_from_profile(row: &mut Condition, profiles: &FieldProfiles, was_boolean: bool) {
    let Some(profile) = profiles.get(&row.field_key) else {
        return;
    };
    if profile.is_boolean() {
        row.threshold = Threshold::single(Operator::BOOLEAN);
        return;
    }
    match &mut row.threshold {
        Threshold::Single { operator, .. } => {
            if was_boolean || !profile.allows(*operator) {
                *operator = profile.default_single_operator();
            }
        }
        Threshold::Range { .. } => {
            if !profile.allows(Operator::Between) {
                row.threshold = Threshold::single(profile.default_single_operator());
            }
        }
    }
}

fn set_condition_type(row: &mut Condition, ct: ConditionType, profiles: &FieldProfiles) {
    if profiles.is_boolean(&row.field_key) {
        force_boolean(row);
        return;
    }
    match ct {
        // Keeps an existing single threshold, drops range bounds.
        ConditionType::Single => {
            row.threshold = Threshold::Single {
                operator: Operator::DEFAULT_SINGLE,
                threshold_value: row.threshold_value(),
            };
        }
        ConditionType::Range => {
            if row.condition_type() == ConditionType::Single {
                row.threshold = Threshold::range();
            }
        }
    }
}

fn set_operator(row: &mut Condition, op: Operator, profiles: &FieldProfiles) {
    if profiles.is_boolean(&row.field_key) {
        force_boolean(row);
        return;
    }
    if op.is_range() {
        set_condition_type(row, ConditionType::Range, profiles);
        return;
    }
    match &mut row.threshold {
        Threshold::Single { operator, .. } => *operator = op,
        Threshold::Range { .. } => row.threshold = Threshold::single(op),
    }
}

/// Boolean fields only support `SINGLE` with the fixed operator.
fn force_boolean(row: &mut Condition) {
    let value = row.threshold_value();
    row.threshold = Threshold::Single {
        operator: Operator::BOOLEAN,
        threshold_value: value,
    };
}
