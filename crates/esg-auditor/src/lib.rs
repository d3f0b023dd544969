//! Scoring, carbon accounting and reporting core for a single-company ESG
//! self-assessment.
//!
//! The pure engines live in [`assessment`], [`carbon`], [`portfolio`] and
//! [`report`]. [`workspace::AuditorWorkspace`] ties them to an injected
//! [`store::KeyValueStore`] so every surface reads the same persisted state
//! and derives its numbers from the same functions.

pub mod assessment;
pub mod carbon;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod profile;
pub mod report;
pub mod store;
pub mod telemetry;
pub mod workspace;
