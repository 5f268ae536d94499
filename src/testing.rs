//! Scripted fake debugger server for tests.
//!
//! Accepts one connection on an ephemeral localhost port, sends the root
//! greeting, then answers every received packet with whatever the handler
//! returns. All packets received are recorded.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::protocol::{FrameBuffer, encode_frame};

// ============================================================================
// Types
// ============================================================================

/// Produces the replies to one received packet.
pub(crate) type Handler = dyn Fn(&Value) -> Vec<Value> + Send + Sync;

// ============================================================================
// FakeServer
// ============================================================================

/// A one-connection debugger server driven by a handler closure.
pub(crate) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<Value>>>,
    task: JoinHandle<()>,
}

impl FakeServer {
    /// Greeting a real browser sends on connect.
    pub(crate) fn greeting() -> Value {
        json!({"from": "root", "applicationType": "browser", "traits": {}})
    }

    /// Starts a server that greets, then replies via `handler`.
    pub(crate) async fn start<F>(handler: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        Self::start_with(Some(Self::greeting()), handler).await
    }

    /// Starts a server with an optional custom greeting.
    pub(crate) async fn start_with<F>(greeting: Option<Value>, handler: F) -> Self
    where
        F: Fn(&Value) -> Vec<Value> + Send + Sync + 'static,
    {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake server");
        let port = listener.local_addr().expect("local addr").port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler: Arc<Handler> = Arc::new(handler);

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            if let Some(greeting) = greeting
                && socket.write_all(&encode_frame(&greeting.to_string())).await.is_err()
            {
                return;
            }

            let mut frames = FrameBuffer::new();
            let mut chunk = vec![0u8; 4096];

            loop {
                let n = match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => n,
                };
                frames.append(&chunk[..n]);

                for text in frames.extract_messages() {
                    let request: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
                    recorded.lock().push(request.clone());

                    for reply in handler(&request) {
                        if socket.write_all(&encode_frame(&reply.to_string())).await.is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Self {
            port,
            requests,
            task,
        }
    }

    /// Port the server listens on.
    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Packets received so far, in order.
    pub(crate) fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }

    /// Received packets whose `type` equals `kind`.
    pub(crate) fn requests_of_type(&self, kind: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|r| r["type"] == kind)
            .collect()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Installs a test subscriber honouring `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Handler for a browser with one tab `{actor: tab1, consoleActor: console1}`.
///
/// Answers `listTabs`, `attach` and echoes `evaluateJS` with `result`
/// produced by `evaluate`.
pub(crate) fn browser_handler<E>(evaluate: E) -> impl Fn(&Value) -> Vec<Value> + Send + Sync + 'static
where
    E: Fn(&str) -> Value + Send + Sync + 'static,
{
    move |request| match request["type"].as_str() {
        Some("listTabs") => vec![json!({
            "from": "root",
            "selected": 0,
            "tabs": [{"actor": "tab1", "consoleActor": "console1", "url": "about:blank"}],
        })],
        Some("attach") => vec![json!({"from": "tab1", "type": "tabAttached", "threadActor": "thread1"})],
        Some("evaluateJS") => {
            let input = request["text"].as_str().unwrap_or_default();
            vec![json!({
                "from": "console1",
                "input": input,
                "result": evaluate(input),
                "timestamp": 0,
                "exception": null,
            })]
        }
        _ => vec![],
    }
}
