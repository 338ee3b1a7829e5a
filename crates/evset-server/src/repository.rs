use evset_common::sort::sort_conditions;
use evset_common::types::{Condition, EventSettingGroup};
use std::collections::BTreeMap;

/// In-memory store behind the reference API. Ids are assigned
/// sequentially and never reused.
#[derive(Debug, Default)]
pub struct SettingsRepository {
    next_id: i64,
    rows: BTreeMap<i64, Condition>,
}

impl SettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository from seed groups. Rows that carry an id keep it;
    /// the others get fresh ids after the highest seeded one.
    pub fn from_groups(groups: Vec<EventSettingGroup>) -> Self {
        let mut repo = Self::new();
        let mut pending = Vec::new();
        for group in groups {
            for mut row in group.conditions {
                if row.profile_type.is_empty() {
                    row.profile_type = group.profile_type.clone();
                }
                match row.id {
                    Some(id) => {
                        repo.next_id = repo.next_id.max(id);
                        repo.rows.insert(id, row);
                    }
                    None => pending.push(row),
                }
            }
        }
        for row in pending {
            repo.create(row);
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Condition> {
        self.rows.get(&id)
    }

    /// Groups ordered by profile type, conditions in canonical order.
    pub fn list_groups(&self) -> Vec<EventSettingGroup> {
        let mut groups: BTreeMap<&str, Vec<Condition>> = BTreeMap::new();
        for row in self.rows.values() {
            groups
                .entry(row.profile_type.as_str())
                .or_default()
                .push(row.clone());
        }
        groups
            .into_iter()
            .map(|(profile_type, mut conditions)| {
                sort_conditions(&mut conditions);
                EventSettingGroup {
                    profile_type: profile_type.to_string(),
                    conditions,
                }
            })
            .collect()
    }

    pub fn create(&mut self, mut condition: Condition) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        condition.id = Some(id);
        self.rows.insert(id, condition);
        id
    }

    /// Replaces the stored row. Returns false when `id` is unknown.
    pub fn update(&mut self, id: i64, mut condition: Condition) -> bool {
        let Some(slot) = self.rows.get_mut(&id) else {
            return false;
        };
        condition.id = Some(id);
        *slot = condition;
        true
    }

    pub fn delete(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }
}
