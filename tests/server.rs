//! End-to-end test against a live listener.

mod common;

use std::time::Duration;

use serde_json::{json, Value};

use common::{TestApp, SAMPLE_CONFIG};
use doctor_config::{HttpServer, Shutdown};

#[tokio::test]
async fn test_serve_update_and_shutdown() {
    let app = TestApp::new(SAMPLE_CONFIG);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(app.state.clone());
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let base = format!("http://{}", addr);

    let res = client
        .post(format!("{}/config/llm/ollama", base))
        .json(&json!({ "value": { "model": "mistral", "timeout": 60 } }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let snapshot: Value = client
        .get(format!("{}/config/", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(snapshot["llm"]["ollama"]["model"], "mistral");
    assert_eq!(snapshot["llm"]["ollama"]["timeout"], 60);
    // base_url was under the replaced mapping, so it falls back to its default.
    assert_eq!(snapshot["llm"]["ollama"]["base_url"], "http://localhost:11434");

    drop(client);
    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}
