#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use planwatch_core::{
    AttemptError, Client, ClientBuilder, ClientConfig, HttpTransport, LogLevel, LogLine,
    MessageId, RawResponse, Renderer, Sender, StatusView,
};

/// Everything a [`RecordingRenderer`] was asked to do, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Message {
        id: MessageId,
        content: String,
        sender: Sender,
    },
    Replace {
        id: MessageId,
        content: String,
    },
    ClearInput,
    InputEnabled(bool),
    ShowPanel,
    HidePanel,
    Reset,
    Status(StatusView),
    Log {
        message: String,
        level: LogLevel,
    },
}

/// Renderer that records every call for later assertions.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Event>>,
    next_id: AtomicU64,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("renderer lock").clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Log { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<StatusView> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Status(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events().iter().filter(|event| *event == wanted).count()
    }

    pub fn log_count(&self, message: &str) -> usize {
        self.logs().iter().filter(|m| *m == message).count()
    }

    fn push(&self, event: Event) {
        self.events.lock().expect("renderer lock").push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn add_message(&self, content: &str, sender: Sender) -> MessageId {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.push(Event::Message {
            id,
            content: content.to_string(),
            sender,
        });
        id
    }

    fn replace_message(&self, id: MessageId, content: &str) {
        self.push(Event::Replace {
            id,
            content: content.to_string(),
        });
    }

    fn clear_input(&self) {
        self.push(Event::ClearInput);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.push(Event::InputEnabled(enabled));
    }

    fn show_status_panel(&self) {
        self.push(Event::ShowPanel);
    }

    fn hide_status_panel(&self) {
        self.push(Event::HidePanel);
    }

    fn reset_status(&self) {
        self.push(Event::Reset);
    }

    fn render_status(&self, view: &StatusView) {
        self.push(Event::Status(view.clone()));
    }

    fn append_log(&self, line: &LogLine) {
        self.push(Event::Log {
            message: line.message.clone(),
            level: line.level,
        });
    }
}

/// One canned answer from a [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum Scripted {
    Body(u16, String),
    Refused,
}

impl Scripted {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Body(200, body.into())
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::Body(200, value.to_string())
    }

    pub fn status(status: u16) -> Self {
        Self::Body(status, String::new())
    }
}

/// In-memory transport answering from per-route queues.
///
/// A route matches any URL containing its key. The last queued answer for a
/// route repeats once the queue is drained. Unmatched URLs are refused.
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<String>>,
    delay: Duration,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    /// Every request waits `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            delay,
        }
    }

    pub fn route(self, key: &str, answers: impl IntoIterator<Item = Scripted>) -> Self {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(key.to_string(), answers.into_iter().collect());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self, key: &str) -> usize {
        self.requests().iter().filter(|url| url.contains(key)).count()
    }

    fn next_answer(&self, url: &str) -> Scripted {
        let mut routes = self.routes.lock().expect("routes lock");
        let Some(queue) = routes
            .iter_mut()
            .find(|(key, _)| url.contains(key.as_str()))
            .map(|(_, queue)| queue)
        else {
            return Scripted::Refused;
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(Scripted::Refused)
        } else {
            queue.front().cloned().unwrap_or(Scripted::Refused)
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        _timeout: Option<Duration>,
    ) -> Result<RawResponse, AttemptError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(url.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.next_answer(url) {
            Scripted::Body(status, body) => Ok(RawResponse::new(status, body)),
            Scripted::Refused => Err(AttemptError::Network {
                message: "connection refused".to_string(),
            }),
        }
    }
}

/// Helper function to create a client around a scripted transport
pub fn create_test_client(
    transport: Arc<ScriptedTransport>,
) -> (Arc<RecordingRenderer>, Client) {
    create_test_client_with_config(transport, ClientConfig::default())
}

pub fn create_test_client_with_config(
    transport: Arc<ScriptedTransport>,
    config: ClientConfig,
) -> (Arc<RecordingRenderer>, Client) {
    let renderer = Arc::new(RecordingRenderer::default());
    let client = ClientBuilder::new()
        .with_config(config)
        .with_transport(transport)
        .build(renderer.clone())
        .expect("Failed to build client");
    (renderer, client)
}
