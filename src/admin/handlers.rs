use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::http::{ApiError, AppState};
use crate::observability::metrics;
use crate::store::StoreState;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub config_path: String,
    pub store: StoreState,
}

/// Nested view of the settings served by `GET /config/`.
#[derive(Serialize)]
pub struct ConfigSnapshot {
    pub api: ApiSection,
    pub llm: LlmSection,
    pub analysis: AnalysisSection,
    pub reports: ReportsSection,
}

#[derive(Serialize)]
pub struct ApiSection {
    pub host: String,
    pub port: u16,
    pub workers: u32,
    pub allowed_origins: Vec<String>,
}

#[derive(Serialize)]
pub struct LlmSection {
    pub provider: Value,
    pub ollama: OllamaSection,
}

#[derive(Serialize)]
pub struct OllamaSection {
    pub base_url: String,
    pub model: String,
    pub timeout: u64,
}

#[derive(Serialize)]
pub struct AnalysisSection {
    pub max_log_size_mb: u64,
    pub max_queries_per_request: u32,
    pub min_duration_ms: u64,
    pub top_n_queries: u32,
    pub supported_formats: Vec<String>,
}

#[derive(Serialize)]
pub struct ReportsSection {
    pub formats: Vec<String>,
    pub syntax_highlighting: bool,
    pub include_execution_plan: bool,
    pub max_queries_per_report: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct UpdateQuery {
    value: Option<String>,
}

/// New value for `POST /config/{section}/{key}`.
///
/// Taken from `?value=` when present, otherwise from a JSON body
/// `{"value": ...}`. A query value is read as JSON when it parses as JSON
/// (`9001`, `true`, `["csv"]`) and as a plain string otherwise.
#[derive(Debug)]
pub struct UpdateValue(pub serde_json::Value);

impl<S> FromRequest<S> for UpdateValue
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<UpdateQuery>::try_from_uri(req.uri())?;
        if let Some(raw) = query.value {
            return Ok(Self(parse_query_value(raw)));
        }

        let Json(body) = Json::<UpdateRequest>::from_request(req, state).await?;
        Ok(Self(body.value))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn get_root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        config_path: state.store.path().display().to_string(),
        store: state.store.state(),
    })
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigSnapshot> {
    let settings = state.settings.current();

    Json(ConfigSnapshot {
        api: ApiSection {
            host: settings.api_host.clone(),
            port: settings.api_port,
            workers: settings.api_workers,
            allowed_origins: settings.allowed_origins.clone(),
        },
        llm: LlmSection {
            provider: state.store.get("llm.provider", Value::Null),
            ollama: OllamaSection {
                base_url: settings.ollama_base_url.clone(),
                model: settings.ollama_model.clone(),
                timeout: settings.ollama_timeout,
            },
        },
        analysis: AnalysisSection {
            max_log_size_mb: settings.max_log_size_mb,
            max_queries_per_request: settings.max_queries_per_request,
            min_duration_ms: settings.min_duration_ms,
            top_n_queries: settings.top_n_queries,
            supported_formats: settings.supported_formats.clone(),
        },
        reports: ReportsSection {
            formats: settings.report_formats.clone(),
            syntax_highlighting: settings.syntax_highlighting,
            include_execution_plan: settings.include_execution_plan,
            max_queries_per_report: settings.max_queries_per_report,
        },
    })
}

/// Set `section.key`, persist, then reload the settings facade.
pub async fn update_config(
    State(state): State<AppState>,
    Path((section, key)): Path<(String, String)>,
    UpdateValue(new_value): UpdateValue,
) -> Result<Json<MessageResponse>, ApiError> {
    let config_key = format!("{section}.{key}");
    let shown = display_value(&new_value);
    let value = serde_yaml::to_value(&new_value)?;

    let settings = state.settings.clone();
    let target = config_key.clone();
    tokio::task::spawn_blocking(move || -> Result<(), ApiError> {
        settings.store().set(&target, value)?;
        settings.store().save()?;
        settings.reload()?;
        Ok(())
    })
    .await??;

    metrics::record_update(&section);
    tracing::info!(key = %config_key, value = %shown, "Configuration updated");

    Ok(Json(MessageResponse {
        message: format!("Updated {config_key} to {shown}"),
    }))
}

/// Re-read the config file without changing it.
pub async fn reload_config(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    let settings = state.settings.clone();
    tokio::task::spawn_blocking(move || settings.reload()).await??;

    Ok(Json(MessageResponse {
        message: "Configuration reloaded successfully".to_string(),
    }))
}

fn parse_query_value(raw: String) -> serde_json::Value {
    serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_value_unquotes_strings() {
        assert_eq!(display_value(&json!("llama3")), "llama3");
        assert_eq!(display_value(&json!(9000)), "9000");
        assert_eq!(display_value(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_query_value_parsed_as_json_when_possible() {
        assert_eq!(parse_query_value("9001".to_string()), json!(9001));
        assert_eq!(parse_query_value("false".to_string()), json!(false));
        assert_eq!(parse_query_value("llama3:8b".to_string()), json!("llama3:8b"));
        assert_eq!(parse_query_value(r#"["csv"]"#.to_string()), json!(["csv"]));
    }
}
