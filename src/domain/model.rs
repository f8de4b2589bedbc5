use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 一筆職缺，欄位順序保持解析器輸出的順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPosting {
    fields: Map<String, Value>,
}

impl JobPosting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// 缺少標題或標題不是字串時視為空字串
    pub fn title(&self) -> &str {
        self.field_str("title").unwrap_or("")
    }

    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// 空白字串不寫入，讓欄位直接缺席
    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.trim().is_empty() {
            self.fields.insert(name.to_string(), Value::String(value));
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// 去重用的識別：優先 id，其次 url
    pub fn identity(&self) -> Option<String> {
        match self.fields.get("id") {
            Some(Value::String(id)) if !id.is_empty() => return Some(id.clone()),
            Some(Value::Number(id)) => return Some(id.to_string()),
            _ => {}
        }
        self.field_str("url").map(str::to_string)
    }
}

impl From<Map<String, Value>> for JobPosting {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_fields(fields)
    }
}

/// 已正規化的關鍵字：去空白、轉小寫、丟掉空項目，保持原順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    tokens: Vec<String>,
}

impl KeywordSet {
    pub fn normalize<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = raw
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `lowered_title` 必須已轉小寫
    pub fn matches(&self, lowered_title: &str) -> bool {
        self.tokens.iter().any(|k| lowered_title.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectionReport {
    pub raw_count: usize,
    pub filtered: Vec<JobPosting>,
}
