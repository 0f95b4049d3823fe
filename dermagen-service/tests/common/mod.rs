#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use dermagen_service::config::DermagenConfig;
use dermagen_service::services::ImageStore;
use dermagen_service::startup::Application;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// How the stub inference service answers `POST /generate`.
#[derive(Clone)]
pub enum StubReply {
    Json(StatusCode, Value),
    Raw(StatusCode, &'static str),
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    received: Arc<Mutex<Vec<Value>>>,
}

/// A stand-in for the external inference service.
pub struct StubInference {
    pub url: String,
    received: Arc<Mutex<Vec<Value>>>,
}

impl StubInference {
    pub async fn spawn(reply: StubReply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            received: received.clone(),
        };

        let router = Router::new()
            .route("/generate", post(stub_generate))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self { url, received }
    }

    pub async fn images(images: &[&str]) -> Self {
        Self::spawn(StubReply::Json(
            StatusCode::OK,
            serde_json::json!({ "images_base64": images }),
        ))
        .await
    }

    /// Bodies received so far, in arrival order.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn stub_generate(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    state.received.lock().unwrap().push(body);

    match state.reply {
        StubReply::Json(status, value) => (status, Json(value)).into_response(),
        StubReply::Raw(status, text) => (status, text).into_response(),
    }
}

/// URL of a local port with nothing listening on it.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", address)
}

/// URL of a local listener that accepts connections but never answers.
pub async fn silent_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    format!("http://{}", address)
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: ImageStore,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(ai_service_url: &str) -> Self {
        Self::spawn_with(DermagenConfig::with_ai_service(0, ai_service_url)).await
    }

    pub async fn spawn_with(mut config: DermagenConfig) -> Self {
        config.common.host = "127.0.0.1".to_string();
        config.common.port = 0;

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub async fn generate(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/generate", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_images(&self, class: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(format!("{}/api/images", self.address));
        if let Some(class) = class {
            request = request.query(&[("class", class)]);
        }
        request.send().await.expect("Failed to execute request")
    }
}
