use crate::types::Condition;
use std::cmp::Ordering;

/// Total order over conditions: field key, then effective value (missing
/// values last), then severity rank.
pub fn compare_conditions(a: &Condition, b: &Condition) -> Ordering {
    compare_field_keys(&a.field_key, &b.field_key)
        .then_with(|| effective_value(a).total_cmp(&effective_value(b)))
        .then_with(|| a.level.rank().cmp(&b.level.rank()))
}

/// Sorts in place. `sort_by` is stable, so rows equal on every key keep
/// their relative order.
pub fn sort_conditions(conditions: &mut [Condition]) {
    conditions.sort_by(compare_conditions);
}

/// Case-folded comparison first so `Humidity` sits next to `humidity`;
/// byte order breaks the tie to keep the order total.
fn compare_field_keys(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn effective_value(c: &Condition) -> f64 {
    c.threshold.effective_value().unwrap_or(f64::INFINITY)
}
