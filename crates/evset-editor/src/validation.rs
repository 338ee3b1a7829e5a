//! Structural checks over a draft list.
//!
//! Each row reports at most one problem, the first rule it fails. Overlap
//! detection only considers rows that passed every other rule.

use evset_common::profile::FieldProfiles;
use evset_common::types::{Condition, Operator, Threshold};
use std::collections::BTreeSet;

/// Why a single draft row cannot be saved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("field key is required")]
    FieldKeyRequired,

    #[error("operator {operator} is not allowed for field '{field_key}'")]
    OperatorNotAllowed {
        field_key: String,
        operator: Operator,
    },

    #[error("threshold value is required")]
    ThresholdRequired,

    #[error("both range bounds are required")]
    RangeBoundsRequired,

    #[error("range lower bound {left} must be less than upper bound {right}")]
    InvalidRange { left: f64, right: f64 },

    /// `row` is the 1-based number of the earlier, overlapping row.
    #[error("range overlaps row {row} with the same field and level")]
    OverlappingRange { row: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowIssue {
    /// Zero-based position in the draft.
    pub index: usize,
    pub error: RowError,
}

impl std::fmt::Display for RowIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.index + 1, self.error)
    }
}

/// Outcome of [`validate`]; empty when the draft can be saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<RowIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable messages, one per failing row, in row order.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    pub fn error_indices(&self) -> BTreeSet<usize> {
        self.issues.iter().map(|issue| issue.index).collect()
    }

    pub fn error_for(&self, index: usize) -> Option<&RowError> {
        self.issues
            .iter()
            .find(|issue| issue.index == index)
            .map(|issue| &issue.error)
    }
}

pub fn validate(draft: &[Condition], profiles: &FieldProfiles) -> ValidationReport {
    let mut issues = Vec::new();
    let mut valid_ranges: Vec<(usize, &Condition, f64, f64)> = Vec::new();

    for (index, row) in draft.iter().enumerate() {
        match check_row(row, profiles) {
            Ok(()) => {
                if let Threshold::Range {
                    left_value: Some(left),
                    right_value: Some(right),
                } = row.threshold
                {
                    if let Some(&(earlier, ..)) = valid_ranges.iter().find(|(_, other, l, r)| {
                        other.field_key == row.field_key
                            && other.level == row.level
                            && left < *r
                            && *l < right
                    }) {
                        issues.push(RowIssue {
                            index,
                            error: RowError::OverlappingRange { row: earlier + 1 },
                        });
                        continue;
                    }
                    valid_ranges.push((index, row, left, right));
                }
            }
            Err(Some(error)) => issues.push(RowIssue { index, error }),
            Err(None) => {}
        }
    }

    ValidationReport { issues }
}

/// `Err(None)` marks an untouched placeholder row that is neither valid nor
/// worth reporting.
fn check_row(row: &Condition, profiles: &FieldProfiles) -> Result<(), Option<RowError>> {
    if row.field_key.trim().is_empty() {
        if row.is_blank_placeholder() {
            return Err(None);
        }
        return Err(Some(RowError::FieldKeyRequired));
    }

    let profile = profiles.get(&row.field_key);
    let not_allowed = || {
        Some(RowError::OperatorNotAllowed {
            field_key: row.field_key.clone(),
            operator: row.operator(),
        })
    };

    if profile.is_some_and(|p| p.is_boolean()) {
        return if row.operator() == Operator::BOOLEAN {
            Ok(())
        } else {
            Err(not_allowed())
        };
    }

    match row.threshold {
        Threshold::Single {
            operator,
            threshold_value,
        } => {
            if finite(threshold_value).is_none() {
                return Err(Some(RowError::ThresholdRequired));
            }
            if profile.is_some_and(|p| !p.allows(operator)) {
                return Err(not_allowed());
            }
        }
        Threshold::Range {
            left_value,
            right_value,
        } => {
            let (Some(left), Some(right)) = (finite(left_value), finite(right_value)) else {
                return Err(Some(RowError::RangeBoundsRequired));
            };
            if left >= right {
                return Err(Some(RowError::InvalidRange { left, right }));
            }
            if profile.is_some_and(|p| !p.allows(Operator::Between)) {
                return Err(not_allowed());
            }
        }
    }
    Ok(())
}

/// NaN and infinities cannot be sent as JSON numbers, so they count as unset.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
