use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use crate::config::toml_config::SEARCH_KEYWORDS_VAR;
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNAPSHOT: &str = "last_response.html";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "seek-snapshot")]
#[command(about = "Parse a saved job-search snapshot offline and show matching postings")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_SNAPSHOT, help = "Snapshot HTML file to inspect")]
    pub snapshot: String,

    #[arg(long, help = "Optional TOML file with keywords and heuristics")]
    pub config: Option<String>,

    #[arg(
        long,
        env = SEARCH_KEYWORDS_VAR,
        help = "Comma-separated title keywords; overrides the config file"
    )]
    pub keywords: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            snapshot: DEFAULT_SNAPSHOT.to_string(),
            config: None,
            keywords: None,
            verbose: false,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("snapshot", &self.snapshot)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
