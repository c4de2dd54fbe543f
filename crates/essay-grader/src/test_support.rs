//! Test doubles shared by unit tests: scripted providers, a counting upload
//! store, and an in-process HTTP stub standing in for remote providers.

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::Result;
use crate::providers::{ChatOptions, ChatProvider, MultimodalProvider};
use crate::storage::{LocalUploadStore, Release, UploadStore};
use crate::types::{FilePayload, ProviderCallResult};

/// A request received by the stub server
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// HTTP server answering every request with a fixed status and body
pub struct StubServer {
    pub base_url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

async fn capture(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let body = serde_json::from_str(&body).unwrap_or(Value::String(body));
    state.captured.lock().unwrap().push(CapturedRequest {
        path: uri.path().to_string(),
        headers,
        body,
    });
    (state.status, state.body.clone())
}

/// Start a stub provider on an ephemeral local port
pub async fn stub_server(status: StatusCode, body: impl ToString) -> StubServer {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        body: body.to_string(),
        captured: Arc::clone(&captured),
    };
    let app = Router::new().fallback(capture).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{}", addr),
        captured,
    }
}

/// A local URL with nothing listening behind it
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// A call received by [`ScriptedMultimodal`]
#[derive(Debug, Clone)]
pub struct MultimodalCall {
    pub prompt: String,
    pub file: Option<FilePayload>,
    pub credential_index: Option<usize>,
    pub model: String,
}

enum Script {
    Reply(ProviderCallResult, Duration),
    Panic(&'static str),
}

/// Multimodal provider replying per file content, with optional delays
pub struct ScriptedMultimodal {
    scripts: HashMap<Vec<u8>, Script>,
    fallback: ProviderCallResult,
    calls: Mutex<Vec<MultimodalCall>>,
}

impl ScriptedMultimodal {
    /// Reply `fallback` to any call without a matching script
    pub fn replying(fallback: ProviderCallResult) -> Self {
        Self {
            scripts: HashMap::new(),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply `result` after `delay_ms` when the attached file holds `data`
    pub fn on(mut self, data: &[u8], result: ProviderCallResult, delay_ms: u64) -> Self {
        self.scripts
            .insert(data.to_vec(), Script::Reply(result, Duration::from_millis(delay_ms)));
        self
    }

    /// Panic when the attached file holds `data`
    pub fn panic_on(mut self, data: &[u8], message: &'static str) -> Self {
        self.scripts.insert(data.to_vec(), Script::Panic(message));
        self
    }

    pub fn calls(&self) -> Vec<MultimodalCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MultimodalProvider for ScriptedMultimodal {
    async fn generate(
        &self,
        prompt: &str,
        file: Option<&FilePayload>,
        credential_index: Option<usize>,
        model: &str,
    ) -> ProviderCallResult {
        self.calls.lock().unwrap().push(MultimodalCall {
            prompt: prompt.to_string(),
            file: file.cloned(),
            credential_index,
            model: model.to_string(),
        });

        match file.and_then(|f| self.scripts.get(&f.data)) {
            Some(Script::Reply(result, delay)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            Some(Script::Panic(message)) => panic!("{}", message),
            None => self.fallback.clone(),
        }
    }

    fn name(&self) -> &str {
        "scripted-multimodal"
    }
}

/// A call received by [`ScriptedChat`]
#[derive(Debug, Clone)]
pub struct ChatCall {
    pub model: String,
    pub prompt: String,
    pub options: ChatOptions,
}

/// Chat provider returning a fixed result
pub struct ScriptedChat {
    result: ProviderCallResult,
    calls: Mutex<Vec<ChatCall>>,
}

impl ScriptedChat {
    pub fn replying(result: ProviderCallResult) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedChat {
    async fn complete(&self, model: &str, prompt: &str, options: &ChatOptions) -> ProviderCallResult {
        self.calls.lock().unwrap().push(ChatCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            options: options.clone(),
        });
        self.result.clone()
    }

    fn name(&self) -> &str {
        "scripted-chat"
    }
}

/// Local upload store that counts releases per path
#[derive(Default)]
pub struct CountingStore {
    inner: LocalUploadStore,
    releases: Mutex<HashMap<PathBuf, usize>>,
}

impl CountingStore {
    pub fn releases(&self, path: &Path) -> usize {
        self.releases.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_releases(&self) -> usize {
        self.releases.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl UploadStore for CountingStore {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path).await
    }

    async fn release(&self, path: &Path) -> Result<Release> {
        *self
            .releases
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;
        self.inner.release(path).await
    }
}
