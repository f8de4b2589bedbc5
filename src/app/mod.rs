use crate::adapters::heuristics::AutomatedPostDetector;
use crate::adapters::seek::SeekParser;
use crate::adapters::storage::LocalSnapshotStore;
use crate::config::{InspectorConfig, ScraperSettings};
use crate::core::inspector::SnapshotInspector;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::io::Write;
use std::path::PathBuf;

pub type SeekInspector =
    SnapshotInspector<LocalSnapshotStore, SeekParser, Vec<String>, AutomatedPostDetector>;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
    /// 逗號分隔的關鍵字，非空白時取代設定檔與內建清單
    pub search_keywords: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            snapshot: PathBuf::from("last_response.html"),
            config: None,
            search_keywords: None,
        }
    }
}

#[cfg(feature = "cli")]
impl From<&crate::config::CliConfig> for RunOptions {
    fn from(cli: &crate::config::CliConfig) -> Self {
        Self {
            snapshot: PathBuf::from(&cli.snapshot),
            config: cli.config.as_ref().map(PathBuf::from),
            search_keywords: cli.keywords.clone(),
        }
    }
}

/// 組裝檢查器；設定檔不存在時用內建預設
pub fn build_inspector(options: &RunOptions, settings: ScraperSettings) -> Result<SeekInspector> {
    let config = match &options.config {
        Some(path) => {
            tracing::debug!("Loading inspector config from {}", path.display());
            InspectorConfig::from_file(path)?
        }
        None => InspectorConfig::default(),
    };
    config.validate()?;

    let parser = SeekParser::new(settings)?;
    let detector = AutomatedPostDetector::from_config(&config)?;
    let source = LocalSnapshotStore::new(options.snapshot.clone());
    let keywords = config.resolve_keywords(options.search_keywords.as_deref());

    Ok(SnapshotInspector::new(source, parser, keywords, detector))
}

/// 執行整個流程並回傳行程結束碼：0 正常、2 快照缺失、1 其他致命錯誤。
/// 快照缺失優先於設定錯誤回報。
pub fn run<W: Write>(options: &RunOptions, settings: ScraperSettings, out: &mut W) -> i32 {
    let result = LocalSnapshotStore::new(options.snapshot.clone())
        .ensure_present()
        .and_then(|_| build_inspector(options, settings))
        .and_then(|inspector| inspector.run(&mut *out));

    match result {
        Ok(report) => {
            tracing::debug!(
                "Inspection finished: raw={}, filtered={}",
                report.raw_count,
                report.filtered.len()
            );
            0
        }
        Err(e) if e.is_snapshot_missing() => {
            if let Err(write_err) = writeln!(out, "{}", e.user_friendly_message()) {
                tracing::warn!("⚠️ Failed to write missing-snapshot notice: {}", write_err);
            }
            e.exit_code()
        }
        Err(e) => {
            tracing::error!("❌ Inspection failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            e.exit_code()
        }
    }
}
