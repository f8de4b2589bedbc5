use crate::domain::model::{JobPosting, KeywordSet};
use crate::domain::ports::AutomationDetector;

/// A posting is kept iff its lowercased title contains a keyword and the
/// detector does not flag it.
pub fn filter_postings<D>(postings: &[JobPosting], keywords: &KeywordSet, detector: &D) -> Vec<JobPosting>
where
    D: AutomationDetector + ?Sized,
{
    postings
        .iter()
        .filter(|job| {
            let title = job.title().to_lowercase();
            keywords.matches(&title) && !detector.looks_automated(job)
        })
        .cloned()
        .collect()
}
