pub mod filter;
pub mod inspector;

pub use crate::domain::model::{InspectionReport, JobPosting, KeywordSet};
pub use crate::domain::ports::{AutomationDetector, KeywordSource, PostingParser, SnapshotSource};
pub use crate::utils::error::Result;
