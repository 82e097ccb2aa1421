pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{init_db, ReleaseRepository};
pub use domain::{FieldValue, Release, ReleaseId, ReleasePayload};
pub use error::AppError;
