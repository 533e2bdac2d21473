//! Typed settings resolved from the store.
//!
//! Each field is backed by one dotted path plus a literal default. The
//! environment variable with the field's upper-cased name, when set, takes
//! precedence over the document.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::Value;

use crate::settings::env::{EnvSource, EnvValue};
use crate::settings::SettingsError;
use crate::store::{document, ConfigManager};

/// Snapshot of the settings the rest of the process reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    // LLM backend
    pub ollama_base_url: String,
    pub ollama_model: String,
    /// Request timeout in seconds.
    pub ollama_timeout: u64,

    // API
    pub api_host: String,
    pub api_port: u16,
    pub api_workers: u32,
    pub allowed_origins: Vec<String>,

    // Security
    pub api_key_enabled: bool,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub cors_enabled: bool,

    // Analysis
    pub max_log_size_mb: u64,
    pub max_queries_per_request: u32,
    pub min_duration_ms: u64,
    pub top_n_queries: u32,
    pub supported_formats: Vec<String>,

    // Reports
    pub report_formats: Vec<String>,
    pub syntax_highlighting: bool,
    pub include_execution_plan: bool,
    pub max_queries_per_report: u32,

    // Observability
    pub metrics_enabled: bool,
    pub metrics_address: String,
}

impl Settings {
    /// Resolve every field from one copy of the store's document, letting
    /// `env` override.
    pub fn resolve(store: &ConfigManager, env: &dyn EnvSource) -> Result<Self, SettingsError> {
        Self::from_document(&store.document(), env)
    }

    /// Resolve every field from `doc`, letting `env` override.
    pub fn from_document(doc: &Value, env: &dyn EnvSource) -> Result<Self, SettingsError> {
        let r = Resolver { doc, env };

        Ok(Self {
            ollama_base_url: r.field(
                "ollama_base_url",
                "llm.ollama.base_url",
                "http://localhost:11434".to_string(),
            )?,
            ollama_model: r.field("ollama_model", "llm.ollama.model", "llama2:13b".to_string())?,
            ollama_timeout: r.field("ollama_timeout", "llm.ollama.timeout", 300)?,

            api_host: r.field("api_host", "api.host", "0.0.0.0".to_string())?,
            api_port: r.field("api_port", "api.port", 8000)?,
            api_workers: r.field("api_workers", "api.workers", 4)?,
            allowed_origins: r.field(
                "allowed_origins",
                "api.allowed_origins",
                vec!["http://localhost:8000".to_string()],
            )?,

            api_key_enabled: r.field("api_key_enabled", "security.api_key_enabled", false)?,
            api_key: r.field("api_key", "security.api_key", None)?,
            cors_enabled: r.field("cors_enabled", "security.cors_enabled", true)?,

            max_log_size_mb: r.field("max_log_size_mb", "analysis.max_log_size_mb", 50)?,
            max_queries_per_request: r.field(
                "max_queries_per_request",
                "analysis.max_queries_per_request",
                100,
            )?,
            min_duration_ms: r.field("min_duration_ms", "analysis.min_duration_ms", 1000)?,
            top_n_queries: r.field("top_n_queries", "analysis.top_n_queries", 10)?,
            supported_formats: r.field(
                "supported_formats",
                "analysis.formats",
                strings(&["plain", "csv", "json"]),
            )?,

            report_formats: r.field(
                "report_formats",
                "reports.formats",
                strings(&["markdown", "html"]),
            )?,
            syntax_highlighting: r.field(
                "syntax_highlighting",
                "reports.syntax_highlighting",
                true,
            )?,
            include_execution_plan: r.field(
                "include_execution_plan",
                "reports.include_execution_plan",
                true,
            )?,
            max_queries_per_report: r.field(
                "max_queries_per_report",
                "reports.max_queries_per_report",
                50,
            )?,

            metrics_enabled: r.field("metrics_enabled", "observability.metrics_enabled", false)?,
            metrics_address: r.field(
                "metrics_address",
                "observability.metrics_address",
                "0.0.0.0:9090".to_string(),
            )?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

struct Resolver<'a> {
    doc: &'a Value,
    env: &'a dyn EnvSource,
}

impl Resolver<'_> {
    fn field<T>(&self, name: &str, path: &str, default: T) -> Result<T, SettingsError>
    where
        T: EnvValue + DeserializeOwned,
    {
        let var = name.to_ascii_uppercase();
        match self.env.var(&var) {
            Some(raw) => T::parse_env(&raw).ok_or(SettingsError::InvalidEnv { var, value: raw }),
            None => Ok(document::get_as(self.doc, path, default)),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
