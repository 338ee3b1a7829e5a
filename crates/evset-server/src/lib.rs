//! Reference HTTP service for device event settings.
//!
//! Serves `GET/POST /event-settings`, `PATCH/DELETE /event-settings/{id}`,
//! `GET /field-profiles` and `GET /v1/health` from an in-memory
//! [`repository::SettingsRepository`].

pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod repository;
pub mod state;
