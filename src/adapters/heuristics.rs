use crate::config::InspectorConfig;
use crate::domain::model::JobPosting;
use crate::domain::ports::AutomationDetector;
use crate::utils::error::Result;
use regex::{Regex, RegexBuilder};

const TITLE_SEPARATORS: &[char] = &['|', '•', '·', '/'];
const PATTERN_FIELDS: &[&str] = &["title", "company", "teaser"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomationSignal {
    PatternMatch { pattern: String, field: String },
    TitleTooLong(usize),
    TooManySeparators(usize),
    ShoutingTitle,
}

#[derive(Debug, Clone)]
pub struct AutomatedPostDetector {
    patterns: Vec<Regex>,
    max_title_len: usize,
    max_title_separators: usize,
}

impl AutomatedPostDetector {
    /// 所有樣式一律不分大小寫
    pub fn new(patterns: &[String], max_title_len: usize, max_title_separators: usize) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns,
            max_title_len,
            max_title_separators,
        })
    }

    pub fn from_config(config: &InspectorConfig) -> Result<Self> {
        Self::new(
            &config.automated_patterns(),
            config.max_title_len(),
            config.max_title_separators(),
        )
    }

    pub fn signals(&self, posting: &JobPosting) -> Vec<AutomationSignal> {
        let mut signals = Vec::new();

        for field in PATTERN_FIELDS {
            let Some(text) = posting.field_str(field) else {
                continue;
            };
            if let Some(re) = self.patterns.iter().find(|re| re.is_match(text)) {
                signals.push(AutomationSignal::PatternMatch {
                    pattern: re.as_str().to_string(),
                    field: field.to_string(),
                });
            }
        }

        let title = posting.title();
        let title_len = title.chars().count();
        if title_len > self.max_title_len {
            signals.push(AutomationSignal::TitleTooLong(title_len));
        }

        let separators = title.chars().filter(|c| TITLE_SEPARATORS.contains(c)).count();
        if separators >= self.max_title_separators {
            signals.push(AutomationSignal::TooManySeparators(separators));
        }

        if is_shouting(title) {
            signals.push(AutomationSignal::ShoutingTitle);
        }

        signals
    }
}

impl AutomationDetector for AutomatedPostDetector {
    fn looks_automated(&self, posting: &JobPosting) -> bool {
        let signals = self.signals(posting);
        if signals.is_empty() {
            return false;
        }
        tracing::debug!("🤖 '{}' looks automated: {:?}", posting.title(), signals);
        true
    }
}

/// 至少四個字，且超過一半是全大寫（單一字母不算）
fn is_shouting(title: &str) -> bool {
    let words: Vec<&str> = title
        .split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
        .collect();
    if words.len() < 4 {
        return false;
    }

    let upper = words
        .iter()
        .filter(|w| {
            let letters: Vec<char> = w.chars().filter(|c| c.is_alphabetic()).collect();
            letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
        })
        .count();
    upper * 2 > words.len()
}
