pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{heuristics::AutomatedPostDetector, seek::SeekParser, storage::LocalSnapshotStore};
pub use config::{InspectorConfig, ScraperSettings};
pub use crate::core::inspector::SnapshotInspector;
pub use domain::model::{InspectionReport, JobPosting, KeywordSet};
pub use utils::error::{InspectorError, Result};
