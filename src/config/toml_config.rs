use crate::utils::error::{InspectorError, Result};
use crate::utils::validation::{validate_positive_number, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SEARCH_KEYWORDS_VAR: &str = "SEARCH_KEYWORDS";

pub const DEFAULT_KEYWORDS: &[&str] = &[
    "software engineer",
    "developer",
    "engineer",
    "python",
    "rust",
    "backend",
    "data",
];

pub const DEFAULT_AUTOMATED_PATTERNS: &[&str] = &[
    r"auto[- ]?generated",
    r"\bbot\b",
    r"apply (now )?via (our )?(app|link|whatsapp|telegram)",
    r"\bdm (me|us)\b",
    r"earn \$?\d+.*(per|a) (day|hour|week)",
    r"no experience (needed|required)",
];

pub const DEFAULT_MAX_TITLE_LEN: usize = 120;
pub const DEFAULT_MAX_TITLE_SEPARATORS: usize = 3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectorConfig {
    pub keywords: Option<Vec<String>>,
    pub heuristics: Option<HeuristicsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    pub patterns: Option<Vec<String>>,
    pub max_title_len: Option<usize>,
    pub max_title_separators: Option<usize>,
}

impl InspectorConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InspectorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// 同上，但 `${VAR}` 由 `lookup` 解析
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;
        let config: Self = toml::from_str(&processed_content)?;
        Ok(config)
    }

    /// 替換變數 (例如 ${SEARCH_TERM})，未設定的保持原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}")?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 關鍵字來源優先順序：SEARCH_KEYWORDS（由呼叫端傳入）> 設定檔 > 內建清單
    pub fn resolve_keywords(&self, override_value: Option<&str>) -> Vec<String> {
        if let Some(raw) = override_value.filter(|v| !v.trim().is_empty()) {
            return raw.split(',').map(str::to_string).collect();
        }
        if let Some(keywords) = &self.keywords {
            return keywords.clone();
        }
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    }

    pub fn automated_patterns(&self) -> Vec<String> {
        self.heuristics
            .as_ref()
            .and_then(|h| h.patterns.clone())
            .unwrap_or_else(|| {
                DEFAULT_AUTOMATED_PATTERNS
                    .iter()
                    .map(|p| p.to_string())
                    .collect()
            })
    }

    pub fn max_title_len(&self) -> usize {
        self.heuristics
            .as_ref()
            .and_then(|h| h.max_title_len)
            .unwrap_or(DEFAULT_MAX_TITLE_LEN)
    }

    pub fn max_title_separators(&self) -> usize {
        self.heuristics
            .as_ref()
            .and_then(|h| h.max_title_separators)
            .unwrap_or(DEFAULT_MAX_TITLE_SEPARATORS)
    }
}

impl Validate for InspectorConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("heuristics.max_title_len", self.max_title_len(), 1)?;
        validate_positive_number(
            "heuristics.max_title_separators",
            self.max_title_separators(),
            1,
        )?;

        for pattern in self.automated_patterns() {
            if let Err(e) = Regex::new(&pattern) {
                return Err(InspectorError::InvalidConfigValueError {
                    field: "heuristics.patterns".to_string(),
                    value: pattern,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
keywords = ["Rust", " platform "]

[heuristics]
patterns = ["(?i)urgent hiring"]
max_title_len = 80
max_title_separators = 2
"#;

        let config = InspectorConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.resolve_keywords(None), vec!["Rust", " platform "]);
        assert_eq!(config.automated_patterns(), vec!["(?i)urgent hiring"]);
        assert_eq!(config.max_title_len(), 80);
        assert_eq!(config.max_title_separators(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = InspectorConfig::from_toml_str("").unwrap();
        assert_eq!(config.resolve_keywords(None).len(), DEFAULT_KEYWORDS.len());
        assert_eq!(
            config.automated_patterns().len(),
            DEFAULT_AUTOMATED_PATTERNS.len()
        );
        assert_eq!(config.max_title_len(), DEFAULT_MAX_TITLE_LEN);
    }

    #[test]
    fn test_env_keywords_take_precedence() {
        let config = InspectorConfig {
            keywords: Some(vec!["from-file".to_string()]),
            heuristics: None,
        };
        assert_eq!(
            config.resolve_keywords(Some("golang, sre")),
            vec!["golang", " sre"]
        );
        assert_eq!(config.resolve_keywords(Some("  ")), vec!["from-file"]);
    }

    #[test]
    fn test_var_substitution() {
        let lookup = |name: &str| (name == "PRIMARY_KEYWORD").then(|| "kotlin".to_string());

        let config = InspectorConfig::from_toml_str_with(
            r#"keywords = ["${PRIMARY_KEYWORD}", "${UNSET_KEYWORD}"]"#,
            lookup,
        )
        .unwrap();
        assert_eq!(
            config.resolve_keywords(None),
            vec!["kotlin", "${UNSET_KEYWORD}"]
        );
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = InspectorConfig::from_toml_str(
            r#"
[heuristics]
patterns = ["(unclosed"]
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(InspectorError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = InspectorConfig::from_toml_str(
            r#"
[heuristics]
max_title_len = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"keywords = [\"devops\"]\n")
            .unwrap();

        let config = InspectorConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.resolve_keywords(None), vec!["devops"]);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        assert!(matches!(
            InspectorConfig::from_toml_str("keywords = [unterminated"),
            Err(InspectorError::TomlError(_))
        ));
    }
}
