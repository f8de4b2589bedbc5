use crate::config::ScraperSettings;
use crate::domain::model::JobPosting;
use crate::domain::ports::PostingParser;
use crate::utils::error::{InspectorError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::HashSet;

pub const SEEK_BASE_URL: &str = "https://www.seek.com.au";
const REDUX_MARKER: &str = "window.SEEK_REDUX_DATA";
const JOBS_POINTER: &str = "/results/results/jobs";

struct CardSelectors {
    card: Selector,
    title: Selector,
    company: Selector,
    location: Selector,
    salary: Selector,
    listed_at: Selector,
    teaser: Selector,
}

impl CardSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            card: selector(r#"article[data-automation="normalJob"], article[data-card-type="JobCard"]"#)?,
            title: selector(r#"[data-automation="jobTitle"]"#)?,
            company: selector(r#"[data-automation="jobCompany"]"#)?,
            location: selector(r#"[data-automation="jobLocation"]"#)?,
            salary: selector(r#"[data-automation="jobSalary"]"#)?,
            listed_at: selector(r#"[data-automation="jobListingDate"]"#)?,
            teaser: selector(r#"[data-automation="jobShortDescription"]"#)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| InspectorError::ParseError {
        message: format!("invalid selector {}: {:?}", css, e),
    })
}

/// Seek 搜尋結果頁解析器：優先讀取內嵌的 redux 狀態，找不到再退回解析職缺卡片
pub struct SeekParser {
    selectors: CardSelectors,
    job_id_in_url: Regex,
}

impl SeekParser {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        settings.validate()?;
        if settings.dry_run {
            tracing::debug!("Scraper running in dry-run mode, notifications disabled");
        } else if settings.uses_dummy_credentials() {
            tracing::warn!("⚠️ DRY_RUN is off but Telegram credentials are placeholders; nothing is sent offline");
        }

        Ok(Self {
            selectors: CardSelectors::new()?,
            job_id_in_url: Regex::new(r"/job/(\d+)")?,
        })
    }

    fn parse_embedded_state(&self, html: &str) -> Result<Option<Vec<JobPosting>>> {
        let Some(raw) = extract_assigned_object(html, REDUX_MARKER)? else {
            return Ok(None);
        };

        let state: Value = serde_json::from_str(&raw).map_err(|e| InspectorError::ParseError {
            message: format!("embedded search state is not valid JSON: {}", e),
        })?;

        let jobs = match state.pointer(JOBS_POINTER) {
            Some(Value::Array(jobs)) => jobs.iter().map(posting_from_state).collect(),
            _ => Vec::new(),
        };
        tracing::debug!("Embedded state yielded {} jobs", jobs.len());
        Ok(Some(jobs))
    }

    fn parse_cards(&self, html: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        let mut postings = Vec::new();
        for card in document.select(&s.card) {
            let Some(title_el) = card.select(&s.title).next() else {
                continue;
            };
            let title = collapsed_text(title_el);
            if title.is_empty() {
                continue;
            }

            let url = title_el.value().attr("href").map(absolute_url);
            let id = card
                .value()
                .attr("data-job-id")
                .map(str::to_string)
                .or_else(|| {
                    url.as_deref()
                        .and_then(|u| self.job_id_in_url.captures(u))
                        .map(|caps| caps[1].to_string())
                });

            let mut job = JobPosting::new();
            if let Some(id) = id {
                job.insert_text("id", id);
            }
            job.insert_text("title", title);
            job.insert_text("company", first_text(card, &s.company));
            job.insert_text("location", first_text(card, &s.location));
            job.insert_text("salary", first_text(card, &s.salary));
            job.insert_text("listed_at", first_text(card, &s.listed_at));
            job.insert_text("teaser", first_text(card, &s.teaser));
            if let Some(url) = url {
                job.insert_text("url", url);
            }
            postings.push(job);
        }

        tracing::debug!("Card fallback yielded {} jobs", postings.len());
        postings
    }
}

impl PostingParser for SeekParser {
    fn parse(&self, html: &str) -> Result<Vec<JobPosting>> {
        let postings = match self.parse_embedded_state(html)? {
            Some(jobs) if !jobs.is_empty() => jobs,
            _ => self.parse_cards(html),
        };
        Ok(dedupe(postings))
    }
}

fn posting_from_state(job: &Value) -> JobPosting {
    let mut posting = JobPosting::new();
    let id = text_at(job, &["/id"]);

    if let Some(id) = &id {
        posting.insert_text("id", id.clone());
    }
    let fields: [(&str, &[&str]); 7] = [
        ("title", &["/title"]),
        ("company", &["/advertiser/description", "/companyName"]),
        ("location", &["/locations/0/label", "/location"]),
        ("salary", &["/salaryLabel", "/salary"]),
        ("work_type", &["/workTypes/0", "/workType"]),
        ("listed_at", &["/listingDate"]),
        ("teaser", &["/teaser"]),
    ];
    for (name, pointers) in fields {
        if let Some(value) = text_at(job, pointers) {
            posting.insert_text(name, value);
        }
    }
    if let Some(id) = id {
        posting.insert_text("url", format!("{}/job/{}", SEEK_BASE_URL, id));
    }
    posting
}

/// 依序嘗試每個 JSON pointer，回傳第一個非空的字串或數字
fn text_at(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| match value.pointer(p) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// 找出 `marker = {...}` 右側的完整物件字面值；只讀取 marker 的地方（例如 `if (marker)`）會略過
fn extract_assigned_object(html: &str, marker: &str) -> Result<Option<String>> {
    for (pos, _) in html.match_indices(marker) {
        let Some(rest) = html[pos + marker.len()..].trim_start().strip_prefix('=') else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with('{') {
            return scan_object(rest, marker).map(Some);
        }
    }
    Ok(None)
}

/// 掃描到對應的右大括號為止；字串外、值的位置上的 JS `undefined` 改寫成 `null`
fn scan_object(body: &str, marker: &str) -> Result<String> {
    const UNDEFINED: &str = "undefined";

    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while let Some(c) = body[i..].chars().next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
        } else {
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push(c);
                        return Ok(out);
                    }
                }
                'u' if at_value_position(&out) && is_bare_word(&body[i..], UNDEFINED) => {
                    out.push_str("null");
                    i += UNDEFINED.len();
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
        i += c.len_utf8();
    }

    Err(InspectorError::ParseError {
        message: format!("unterminated object after {}", marker),
    })
}

fn at_value_position(scanned: &str) -> bool {
    matches!(scanned.trim_end().chars().last(), Some(':' | '[' | ','))
}

fn is_bare_word(text: &str, word: &str) -> bool {
    text.starts_with(word)
        && !text[word.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn collapsed_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(collapsed_text)
        .unwrap_or_default()
}

fn absolute_url(href: &str) -> String {
    let path = href.split('?').next().unwrap_or(href);
    if path.starts_with("http") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", SEEK_BASE_URL, path)
    } else {
        format!("{}/{}", SEEK_BASE_URL, path)
    }
}

fn dedupe(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|job| match job.identity() {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> SeekParser {
        SeekParser::new(ScraperSettings::offline()).unwrap()
    }

    const STATE_PAGE: &str = r#"<html><head></head><body>
<script>
window.SEEK_REDUX_DATA = {"results":{"results":{"jobs":[
  {"id":"81234567","title":"Senior Rust Engineer","advertiser":{"description":"Ferris & Co"},
   "locations":[{"label":"Melbourne VIC"}],"salaryLabel":"$180k – $200k","workTypes":["Full time"],
   "listingDate":"2024-05-01T00:00:00Z","teaser":"Build {fast} things \"safely\"","extra":undefined},
  {"id":81234568,"title":"Barista","companyName":"Café Zoë","location":"Sydney NSW"},
  {"id":"81234567","title":"Senior Rust Engineer (duplicate)"}
]}}};
window.SEEK_CONFIG = {};
</script></body></html>"#;

    const CARD_PAGE: &str = r#"<html><body>
<article data-automation="normalJob" data-job-id="5001">
  <h3><a data-automation="jobTitle" href="/job/5001?type=standard">  Python
      Developer </a></h3>
  <a data-automation="jobCompany">Snake Labs</a>
  <a data-automation="jobLocation">Brisbane QLD</a>
  <span data-automation="jobSalary">$120k</span>
  <span data-automation="jobListingDate">2d ago</span>
  <span data-automation="jobShortDescription">Django APIs</span>
</article>
<article data-card-type="JobCard">
  <a data-automation="jobTitle" href="/job/5002">Data Engineer</a>
</article>
<article data-automation="normalJob">
  <span>No title here</span>
</article>
<article data-automation="normalJob" data-job-id="5001">
  <a data-automation="jobTitle" href="/job/5001">Python Developer</a>
</article>
</body></html>"#;

    #[test]
    fn test_parses_embedded_state() {
        let jobs = parser().parse(STATE_PAGE).unwrap();
        assert_eq!(jobs.len(), 2);

        let first = &jobs[0];
        let keys: Vec<&str> = first.fields().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "title", "company", "location", "salary", "work_type", "listed_at", "teaser", "url"]
        );
        assert_eq!(first.title(), "Senior Rust Engineer");
        assert_eq!(first.field_str("company"), Some("Ferris & Co"));
        assert_eq!(first.field_str("teaser"), Some("Build {fast} things \"safely\""));
        assert_eq!(
            first.field_str("url"),
            Some("https://www.seek.com.au/job/81234567")
        );

        let second = &jobs[1];
        assert_eq!(second.field_str("id"), Some("81234568"));
        assert_eq!(second.field_str("company"), Some("Café Zoë"));
        assert_eq!(second.field_str("location"), Some("Sydney NSW"));
        assert!(second.get("salary").is_none());
    }

    #[test]
    fn test_falls_back_to_cards() {
        let jobs = parser().parse(CARD_PAGE).unwrap();
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0].field_str("id"), Some("5001"));
        assert_eq!(jobs[0].title(), "Python Developer");
        assert_eq!(jobs[0].field_str("company"), Some("Snake Labs"));
        assert_eq!(jobs[0].field_str("salary"), Some("$120k"));
        assert_eq!(
            jobs[0].field_str("url"),
            Some("https://www.seek.com.au/job/5001")
        );

        assert_eq!(jobs[1].field_str("id"), Some("5002"));
        assert_eq!(jobs[1].title(), "Data Engineer");
        assert!(jobs[1].get("company").is_none());
    }

    #[test]
    fn test_empty_state_falls_back_to_cards() {
        let html = format!(
            "<script>window.SEEK_REDUX_DATA = {{\"results\":{{\"results\":{{\"jobs\":null}}}}}};</script>{}",
            CARD_PAGE
        );
        assert_eq!(parser().parse(&html).unwrap().len(), 2);
    }

    #[test]
    fn test_page_without_jobs_is_empty() {
        assert!(parser().parse("<html><body>No results</body></html>").unwrap().is_empty());
    }

    #[test]
    fn test_broken_state_is_parse_error() {
        let html = r#"<script>window.SEEK_REDUX_DATA = {"results": {"jobs": [</script>"#;
        assert!(matches!(
            parser().parse(html),
            Err(InspectorError::ParseError { .. })
        ));

        let invalid = r#"<script>window.SEEK_REDUX_DATA = {results: 1};</script>"#;
        assert!(matches!(
            parser().parse(invalid),
            Err(InspectorError::ParseError { .. })
        ));
    }

    #[test]
    fn test_extract_assigned_object_respects_strings() {
        let html = r#"x = 1; window.SEEK_REDUX_DATA = {"a":"}\"{","b":{"c":1}}; tail"#;
        let obj = extract_assigned_object(html, REDUX_MARKER).unwrap().unwrap();
        assert_eq!(obj, r#"{"a":"}\"{","b":{"c":1}}"#);

        assert!(extract_assigned_object("nothing", REDUX_MARKER).unwrap().is_none());
        assert!(extract_assigned_object("window.SEEK_REDUX_DATA = null;", REDUX_MARKER)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_undefined_rewritten_only_outside_strings() {
        let html = r#"<script>window.SEEK_REDUX_DATA = {"results":{"results":{"jobs":[
  {"id":"7","title":"Rust Engineer","teaser":"Salary: undefined yet","tags":[undefined, undefined],"undefinedCount":undefined}
]}}};</script>"#;
        let jobs = parser().parse(html).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].field_str("teaser"), Some("Salary: undefined yet"));

        let obj = extract_assigned_object(
            r#"window.SEEK_REDUX_DATA = {"a":[undefined,1],"b": undefined,"c":"undefined","undefinedX":undefinedX};"#,
            REDUX_MARKER,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            obj,
            r#"{"a":[null,1],"b": null,"c":"undefined","undefinedX":undefinedX}"#
        );
    }

    #[test]
    fn test_read_before_assignment_is_skipped() {
        let html = r#"<script>
if (window.SEEK_REDUX_DATA) { console.log("hydrated"); }
var same = window.SEEK_REDUX_DATA == null;
window.SEEK_REDUX_DATA = {"results":{"results":{"jobs":[{"id":"9","title":"Platform Engineer"}]}}};
</script>"#;
        let jobs = parser().parse(html).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title(), "Platform Engineer");
        assert_eq!(jobs[0].field_str("url"), Some("https://www.seek.com.au/job/9"));
    }

    #[test]
    fn test_live_mode_with_placeholder_credentials_still_builds() {
        let settings = ScraperSettings {
            dry_run: false,
            ..ScraperSettings::offline()
        };
        assert!(SeekParser::new(settings).is_ok());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("/job/1?ref=x"), "https://www.seek.com.au/job/1");
        assert_eq!(absolute_url("job/2"), "https://www.seek.com.au/job/2");
        assert_eq!(
            absolute_url("https://example.com/job/3?x=1"),
            "https://example.com/job/3"
        );
    }

    #[test]
    fn test_rejects_invalid_settings() {
        let settings = ScraperSettings {
            telegram_chat_id: "not-a-number".to_string(),
            ..ScraperSettings::offline()
        };
        assert!(SeekParser::new(settings).is_err());
    }
}
