use crate::domain::model::JobPosting;
use crate::utils::error::Result;

pub trait SnapshotSource {
    /// 快照不存在時必須回傳 `InspectorError::SnapshotMissing`
    fn read_snapshot(&self) -> Result<String>;
    fn describe(&self) -> String;
}

pub trait PostingParser {
    fn parse(&self, html: &str) -> Result<Vec<JobPosting>>;
}

pub trait KeywordSource {
    fn keywords(&self) -> Vec<String>;
}

pub trait AutomationDetector {
    fn looks_automated(&self, posting: &JobPosting) -> bool;
}

impl<F> AutomationDetector for F
where
    F: Fn(&JobPosting) -> bool,
{
    fn looks_automated(&self, posting: &JobPosting) -> bool {
        self(posting)
    }
}

impl KeywordSource for Vec<String> {
    fn keywords(&self) -> Vec<String> {
        self.clone()
    }
}
