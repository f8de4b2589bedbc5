use crate::core::filter::filter_postings;
use crate::domain::model::{InspectionReport, KeywordSet};
use crate::domain::ports::{AutomationDetector, KeywordSource, PostingParser, SnapshotSource};
use crate::utils::error::Result;
use std::io::Write;

pub struct SnapshotInspector<S, P, K, D> {
    source: S,
    parser: P,
    keywords: K,
    detector: D,
}

impl<S, P, K, D> SnapshotInspector<S, P, K, D>
where
    S: SnapshotSource,
    P: PostingParser,
    K: KeywordSource,
    D: AutomationDetector,
{
    pub fn new(source: S, parser: P, keywords: K, detector: D) -> Self {
        Self {
            source,
            parser,
            keywords,
            detector,
        }
    }

    /// 讀取快照、解析、過濾；快照缺失時不會進行解析
    pub fn inspect(&self) -> Result<InspectionReport> {
        tracing::debug!("Reading snapshot from {}", self.source.describe());
        let html = self.source.read_snapshot()?;
        tracing::debug!("Snapshot loaded ({} bytes)", html.len());

        let postings = self.parser.parse(&html)?;
        let raw_count = postings.len();
        tracing::info!("📄 Parsed {} postings", raw_count);

        if postings.is_empty() {
            return Ok(InspectionReport {
                raw_count,
                filtered: Vec::new(),
            });
        }

        let keywords = KeywordSet::normalize(self.keywords.keywords());
        tracing::debug!("Keywords: {:?}", keywords.tokens());
        if keywords.is_empty() {
            tracing::warn!("⚠️ Keyword set is empty, nothing will match");
        }

        let filtered = filter_postings(&postings, &keywords, &self.detector);
        tracing::info!("🔍 {} of {} postings kept", filtered.len(), raw_count);

        Ok(InspectionReport {
            raw_count,
            filtered,
        })
    }

    pub fn run<W: Write>(&self, out: &mut W) -> Result<InspectionReport> {
        let report = self.inspect()?;
        render_report(&report, out)?;
        Ok(report)
    }
}

/// 原始數量為零時整個過濾段落都不輸出
pub fn render_report<W: Write>(report: &InspectionReport, out: &mut W) -> Result<()> {
    writeln!(out, "Found (raw): {}", report.raw_count)?;
    if report.raw_count == 0 {
        return Ok(());
    }

    writeln!(out, "Found (filtered): {}", report.filtered.len())?;
    if !report.filtered.is_empty() {
        let json = serde_json::to_string_pretty(&report.filtered)?;
        writeln!(out, "{}", json)?;
    }
    Ok(())
}
