//! Editing workflow engine for conference contributions.
//!
//! The crate models the editing side of an event management system: per-event
//! registries of accepted file types, editable documents tied to contributions,
//! their revision timelines with comments and tags, and the review/confirmation
//! actions editors and submitters exchange. Serialization views shape all of it
//! for API consumers, gated by the ambient user's permissions.

pub mod agreements;
pub mod config;
pub mod editing;
pub mod error;
pub mod telemetry;
pub mod text;
pub mod validation;
