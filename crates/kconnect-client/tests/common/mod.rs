//! In-memory Connect worker for lifecycle tests.
//!
//! Implements just enough of the worker REST API to exercise create, read,
//! update and delete against real state over HTTP.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

type Db = Arc<RwLock<BTreeMap<String, Map<String, Value>>>>;

type ApiResult = std::result::Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

/// A Connect worker running in the background on a random port.
pub struct TestWorker {
    pub addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl TestWorker {
    /// Start a worker with no connectors.
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app()).await {
                eprintln!("test worker stopped: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// Base URL with the trailing slash the client expects.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }
}

fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/", get(cluster_info))
        .route("/connectors", get(list_connectors).post(create_connector))
        .route("/connectors/{name}", get(get_connector))
        .route("/connectors/{name}/", delete(delete_connector))
        .route(
            "/connectors/{name}/config",
            get(get_config).put(put_config),
        )
        .with_state(db)
}

#[derive(Deserialize)]
struct CreateConnector {
    name: String,
    #[serde(default)]
    config: Map<String, Value>,
}

fn not_found(name: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error_code": 404, "message": format!("Connector {} not found", name)})),
    )
}

/// Worker representation: the stored config gains a `name` key and one task.
fn render(name: &str, config: &Map<String, Value>) -> Value {
    json!({
        "name": name,
        "config": config,
        "tasks": [{"connector": name, "task": 0}],
    })
}

async fn cluster_info() -> Json<Value> {
    Json(json!({
        "version": "3.7.0",
        "commit": "2ae524ed625438c5",
        "kafka_cluster_id": "test-cluster",
    }))
}

async fn list_connectors(State(db): State<Db>) -> Json<Vec<String>> {
    Json(db.read().await.keys().cloned().collect())
}

async fn create_connector(State(db): State<Db>, Json(input): Json<CreateConnector>) -> ApiResult {
    let mut connectors = db.write().await;
    if connectors.contains_key(&input.name) {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error_code": 409,
                "message": format!("Connector {} already exists", input.name),
            })),
        ));
    }

    let mut config = input.config;
    config.insert("name".to_string(), Value::String(input.name.clone()));
    let body = render(&input.name, &config);
    connectors.insert(input.name, config);
    Ok((StatusCode::CREATED, Json(body)))
}

async fn get_connector(State(db): State<Db>, Path(name): Path<String>) -> ApiResult {
    let connectors = db.read().await;
    let config = connectors.get(&name).ok_or_else(|| not_found(&name))?;
    Ok((StatusCode::OK, Json(render(&name, config))))
}

async fn get_config(State(db): State<Db>, Path(name): Path<String>) -> ApiResult {
    let connectors = db.read().await;
    let config = connectors.get(&name).ok_or_else(|| not_found(&name))?;
    Ok((StatusCode::OK, Json(Value::Object(config.clone()))))
}

async fn put_config(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(mut config): Json<Map<String, Value>>,
) -> ApiResult {
    let mut connectors = db.write().await;
    let status = if connectors.contains_key(&name) {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    config.insert("name".to_string(), Value::String(name.clone()));
    let body = render(&name, &config);
    connectors.insert(name, config);
    Ok((status, Json(body)))
}

async fn delete_connector(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> std::result::Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut connectors = db.write().await;
    connectors.remove(&name).ok_or_else(|| not_found(&name))?;
    Ok(StatusCode::NO_CONTENT)
}
