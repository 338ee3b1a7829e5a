//! Shared data model for event-condition editing.
//!
//! [`types::Condition`] is the alerting rule exchanged with the
//! event-settings API, [`profile::FieldProfiles`] describes the value domain
//! of each measurement, and [`sort`] holds the canonical row ordering.

pub mod error;
pub mod profile;
pub mod sort;
pub mod types;

#[cfg(test)]
mod tests;
