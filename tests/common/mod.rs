//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use doctor_config::{AppState, ConfigManager, HttpServer, SettingsFacade};

pub const SAMPLE_CONFIG: &str = "\
api:
  host: 127.0.0.1
  port: 8000
  workers: 2
  allowed_origins:
    - http://localhost:3000
llm:
  provider: ollama
  ollama:
    base_url: http://ollama:11434
    model: llama2:13b
    timeout: 120
analysis:
  top_n_queries: 5
reports:
  formats: [markdown]
";

/// A router over a config file in a scratch directory.
pub struct TestApp {
    _dir: TempDir,
    pub path: PathBuf,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new(content: &str) -> Self {
        Self::with_env(content, &[])
    }

    pub fn with_env(content: &str, env: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, content).unwrap();

        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let store = Arc::new(ConfigManager::open(&path).unwrap());
        let settings = Arc::new(SettingsFacade::new(store, Arc::new(env)).unwrap());
        let state = AppState::new(settings);
        let router = HttpServer::new(state.clone()).router();

        Self {
            _dir: dir,
            path,
            state,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        let mut builder = Request::post(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub fn file_contents(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }
}
