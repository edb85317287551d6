//! Work-quality scoring for CKP performance narratives.
//!
//! The [`scoring`] module holds the engine: a rule-based scorer and a model-backed scorer that
//! share one contract, selected once at startup. The remaining modules are the service plumbing
//! around it (configuration, telemetry, CSV datasets, talent and graph lookups, HTTP routing).

pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod scoring;
pub mod service;
pub mod talent;
pub mod telemetry;
