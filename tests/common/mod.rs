#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use smartrate_rust::ai::{GenerateRequest, GenerativeModel};
use smartrate_rust::{router, AiError, AiService, AppState, CatalogStore};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

type Responder = dyn Fn(&GenerateRequest) -> Result<Value, AiError> + Send + Sync;

/// 按提示词返回预设 JSON 的模型
pub struct ScriptedModel {
    responder: Box<Responder>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(
        responder: impl Fn(&GenerateRequest) -> Result<Value, AiError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_json(&self, request: GenerateRequest) -> Result<Value, AiError> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        (self.responder)(&request)
    }
}

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub model: Arc<ScriptedModel>,
    pub dir: tempfile::TempDir,
}

/// 用内置费率表 + 脚本模型启动应用
pub fn seeded_app(model: Arc<ScriptedModel>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::open_or_seed(dir.path().join("rates.json")).unwrap();
    let state = AppState::new(store, AiService::new(model.clone()));
    TestApp {
        app: router(state.clone()),
        state,
        model,
        dir,
    }
}

pub fn empty_app(model: Arc<ScriptedModel>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::open(dir.path().join("rates.json")).unwrap();
    let state = AppState::new(store, AiService::new(model.clone()));
    TestApp {
        app: router(state.clone()),
        state,
        model,
        dir,
    }
}

/// 指定费率库路径启动空应用 (例如不可写的路径)
pub fn app_at(path: std::path::PathBuf, model: Arc<ScriptedModel>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let store = CatalogStore::open(path).unwrap();
    let state = AppState::new(store, AiService::new(model.clone()));
    TestApp {
        app: router(state.clone()),
        state,
        model,
        dir,
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}
