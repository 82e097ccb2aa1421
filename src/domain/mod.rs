//! Domain types for the releases service.

pub mod release;

pub use release::{FieldValue, Release, ReleaseId, ReleasePayload};
