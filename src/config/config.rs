//! Application configuration and CLI argument parsing.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use super::jurisdictions::{self, Jurisdiction};
use super::templates;
use crate::error::ConfigError;

/// Output format for rendered research results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable report (Markdown)
    #[default]
    Text,
    /// The full research result as pretty-printed JSON
    Json,
}

/// Grok API key. Read once at startup and handed to the dispatcher; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Clap value parser. Blank keys are accepted here and rejected by [`AppConfig::credentials`].
    fn parse(s: &str) -> Result<Self, Infallible> {
        Ok(Self(s.to_string()))
    }

    /// The secret value, for the Authorization header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Legal Eagle application configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "legal-eagle")]
#[command(author, version, about = "AI-powered Australian legal research assistant", long_about = None)]
pub struct AppConfig {
    /// List all supported jurisdictions and exit
    #[arg(long)]
    pub list_jurisdictions: bool,

    /// List the quick query templates and exit
    #[arg(long)]
    pub list_templates: bool,

    /// Grok API key
    #[arg(long, env = "GROK_API_KEY", hide_env_values = true, value_parser = ApiKey::parse)]
    pub api_key: Option<ApiKey>,

    /// Grok API base URL (OpenAI-compatible)
    #[arg(long, env = "GROK_API_URL", default_value = "https://api.x.ai/v1")]
    pub api_url: String,

    /// Grok model name
    #[arg(long, short = 'm', env = "GROK_MODEL", default_value = "grok-2")]
    pub model: String,

    /// System prompt for the LLM
    #[arg(
        long,
        default_value = "You are Legal Eagle, an expert Australian legal research assistant. You provide comprehensive legal research following the exact format shown in examples. Always include specific section numbers, real case citations, and direct AustLII links. Focus on practical application and real precedents."
    )]
    pub system_prompt: String,

    /// LLM temperature (0.0-2.0)
    #[arg(long, default_value = "0.7", value_parser = parse_temperature)]
    pub temperature: f32,

    /// Timeout in seconds for the Grok API request
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,

    /// Jurisdiction, by name or AustLII code (e.g. "Victoria", "nsw")
    #[arg(long, short = 'j', default_value = "Victoria", value_parser = jurisdictions::parse_jurisdiction)]
    pub jurisdiction: &'static Jurisdiction,

    /// Run a single query and exit (interactive mode when omitted)
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Case file (.txt, .md or .pdf) to include as context (repeatable)
    #[arg(long = "context", short = 'c', value_name = "FILE")]
    pub context_files: Vec<PathBuf>,

    /// Do not search AustLII; send the query to the LLM only
    #[arg(long)]
    pub skip_search: bool,

    /// AustLII primary host
    #[arg(long, default_value = "http://www.austlii.edu.au")]
    pub austlii_url: String,

    /// AustLII mirror host used for the auto-method search
    #[arg(long, default_value = "http://www7.austlii.edu.au")]
    pub austlii_mirror_url: String,

    /// Maximum number of cases to collect from AustLII
    #[arg(long, default_value = "10")]
    pub case_limit: usize,

    /// Timeout in seconds for each AustLII search page
    #[arg(long, default_value = "5")]
    pub search_timeout_secs: u64,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Save each text report to the report directory
    #[arg(long)]
    pub save: bool,

    /// Directory for saved reports
    #[arg(long, env = "LEGAL_EAGLE_REPORT_DIR", default_value_os_t = default_report_dir())]
    pub report_dir: PathBuf,

    /// Maximum requests per budget window
    #[arg(long, default_value = "100")]
    pub max_requests: u32,

    /// Request budget window in seconds
    #[arg(long, default_value = "3600")]
    pub budget_window_secs: u64,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    ///
    /// A `.env` file in the working directory is loaded first so that it can supply
    /// `GROK_API_KEY` the same way a hosting platform's secret store would.
    pub fn from_args() -> Self {
        dotenvy::dotenv().ok();

        let config = Self::parse();

        if config.list_jurisdictions {
            jurisdictions::print_jurisdictions();
            std::process::exit(0);
        }

        if config.list_templates {
            templates::print_templates();
            std::process::exit(0);
        }

        config
    }

    /// Return the API key, or `MissingCredential` when it is absent or blank.
    pub fn credentials(&self) -> Result<ApiKey, ConfigError> {
        match &self.api_key {
            Some(key) if !key.expose().trim().is_empty() => Ok(ApiKey(key.expose().trim().to_string())),
            _ => Err(ConfigError::MissingCredential),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn budget_window(&self) -> Duration {
        Duration::from_secs(self.budget_window_secs)
    }

    /// Validate the configuration. The credential is checked separately via [`Self::credentials`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for url in [&self.api_url, &self.austlii_url, &self.austlii_mirror_url] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(url.clone()));
            }
        }

        if let Some(path) = self.context_files.iter().find(|p| !p.exists()) {
            return Err(ConfigError::ContextFileNotFound(path.clone()));
        }

        if self.case_limit == 0 {
            return Err(ConfigError::InvalidCaseLimit);
        }

        Ok(())
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  API URL: {}", self.api_url);
        info!("  Model: {}", self.model);
        info!("  Temperature: {}", self.temperature);
        info!("  Jurisdiction: {} ({})", self.jurisdiction.name, self.jurisdiction.code);
        if self.skip_search {
            info!("  AustLII search: disabled");
        } else {
            info!("  AustLII: {} (mirror {}), up to {} cases", self.austlii_url, self.austlii_mirror_url, self.case_limit);
        }
        if !self.context_files.is_empty() {
            info!("  Context files: {}", self.context_files.len());
        }
        info!("  Request budget: {} per {}s", self.max_requests, self.budget_window_secs);
        if self.save {
            info!("  Report directory: {}", self.report_dir.display());
        }
        debug!("  System prompt: {}...", &self.system_prompt.chars().take(50).collect::<String>());
    }
}

/// Get the default report directory (~/.legal-eagle/reports).
fn default_report_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".legal-eagle").join("reports")
    } else {
        PathBuf::from("reports")
    }
}

/// Parse and validate temperature value (0.0-2.0).
fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{}' is not a valid float", s))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 2.0, got {}", value))
    }
}
