//! One-shot chat requests.
//!
//! [`ChatRequestHandler`] sends the user's query to the chat endpoint,
//! keeps at most one request in flight, and starts a polling session so the
//! plan's progress is visible while the backend works.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use log::{debug, info, warn};
use tokio::time;

use crate::{
    config::ChatConfig,
    endpoints::Endpoints,
    fallback::FallbackRequestClient,
    models::{ChatReply, LogEntry},
    polling::{PollingController, SessionId},
    render::{Renderer, Sender},
};

/// Placeholder shown while waiting for the reply.
pub const THINKING_MESSAGE: &str = "Thinking...";

/// Reply shown when the request could not be completed.
pub const FAILURE_MESSAGE: &str = "Sorry, the service ran into a problem. Please try again later.";

/// What a call to [`ChatRequestHandler::handle_send_message`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Empty input, or another request was already in flight
    Ignored,
    /// The backend answered
    Replied(ChatReply),
    /// Every candidate failed; carries the underlying error text
    Failed(String),
}

/// Sends chat queries, one at a time.
pub struct ChatRequestHandler {
    client: FallbackRequestClient,
    endpoints: Endpoints,
    controller: PollingController,
    renderer: Arc<dyn Renderer>,
    completion_linger: Duration,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path, including cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ChatRequestHandler {
    /// Creates a handler. Requests are bounded by the configured chat
    /// timeout.
    pub fn new(
        client: &FallbackRequestClient,
        endpoints: Endpoints,
        controller: PollingController,
        renderer: Arc<dyn Renderer>,
        config: &ChatConfig,
    ) -> Self {
        Self {
            client: client.with_timeout(config.timeout()),
            endpoints,
            controller,
            renderer,
            completion_linger: config.completion_linger(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a chat request is outstanding.
    pub fn is_waiting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn controller(&self) -> &PollingController {
        &self.controller
    }

    /// Sends `input` as a query unless it is blank or a request is already
    /// in flight.
    ///
    /// The user's message is shown immediately, followed by a placeholder
    /// that is replaced by the reply or by a failure message. A polling
    /// session runs for the duration of the request. After a successful
    /// reply it keeps running for a short linger before the normal stop
    /// path; after an error it is stopped right away.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn handle_send_message(&self, input: &str) -> SendOutcome {
        let query = input.trim();
        if query.is_empty() {
            return SendOutcome::Ignored;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Ignoring send while a request is in flight");
            return SendOutcome::Ignored;
        }
        let _guard = InFlightGuard(&self.in_flight);

        let renderer = self.renderer.as_ref();
        renderer.add_message(query, Sender::User);
        renderer.clear_input();
        let placeholder = renderer.add_message(THINKING_MESSAGE, Sender::System);
        renderer.set_input_enabled(false);

        let session = self.controller.start();
        info!(
            "Sending chat query ({} chars, timeout {:?})",
            query.len(),
            self.client.timeout()
        );

        let urls = self.endpoints.chat_urls(query);
        match self.client.fetch_with_fallback(&urls).await {
            Ok(value) => {
                let reply = ChatReply::from_value(value);
                renderer.replace_message(placeholder, reply.display_text());
                renderer.set_input_enabled(true);

                if reply.error.is_some() {
                    self.controller.stop_session(session);
                } else {
                    self.linger_then_stop(session);
                }
                SendOutcome::Replied(reply)
            }
            Err(error) => {
                warn!("Chat request failed: {error}");
                let text = error.to_string();
                renderer.replace_message(placeholder, &format!("{FAILURE_MESSAGE} ({text})"));
                renderer.set_input_enabled(true);

                self.controller
                    .add_log(LogEntry::error(format!("Chat request failed: {text}")));
                self.controller.stop_session(session);
                SendOutcome::Failed(text)
            }
        }
    }

    fn linger_then_stop(&self, session: SessionId) {
        if self.completion_linger.is_zero() {
            self.controller.stop_session(session);
            return;
        }

        let controller = self.controller.clone();
        let linger = self.completion_linger;
        tokio::spawn(async move {
            time::sleep(linger).await;
            controller.stop_session(session);
        });
    }
}
