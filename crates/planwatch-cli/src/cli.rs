//! Command handlers for the planwatch CLI
//!
//! Each handler drives the core client and lets the terminal renderer do the
//! printing. Handlers that start a polling session return once the
//! controller reports [`PollPhase::Stopped`] or the user presses Ctrl-C.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use log::info;
use planwatch_core::{
    models::PlanStatus, Client, LogLine, PollPhase, Renderer, SendOutcome, Sender, StatusOutcome,
    StatusView,
};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    signal,
};

use crate::renderer::TerminalRenderer;

/// Greeting shown when the interactive mode starts.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your plan assistant. What can I help you with?";

pub struct Cli {
    client: Client,
    renderer: Arc<TerminalRenderer>,
}

impl Cli {
    pub fn new(client: Client, renderer: Arc<TerminalRenderer>) -> Self {
        Self { client, renderer }
    }

    /// Sends one query and follows the plan until polling stops.
    pub async fn chat(&self, query: &str) -> Result<()> {
        let Some(outcome) = self.send_interruptibly(query).await else {
            return Ok(());
        };
        match outcome {
            SendOutcome::Ignored => bail!("Nothing to send: the query is empty"),
            SendOutcome::Failed(error) => Err(anyhow!("Chat request failed: {error}")),
            SendOutcome::Replied(reply) => {
                self.wait_until_stopped().await?;
                if reply.is_error() {
                    bail!("The service reported an error: {}", reply.display_text());
                }
                Ok(())
            }
        }
    }

    /// Fetches the status once and renders whatever came back.
    pub async fn status(&self) -> Result<()> {
        let outcome = self
            .client
            .controller()
            .fetch_status()
            .await
            .context("Failed to reach the status endpoint")?;

        match outcome {
            StatusOutcome::Update(response) => {
                let mut plan = PlanStatus::default();
                plan.merge(&response);

                self.renderer.show_status_panel();
                self.renderer.render_status(&StatusView::from_plan(&plan));
                for entry in response.logs.unwrap_or_default() {
                    self.renderer.append_log(&LogLine::stamp(entry));
                }
                Ok(())
            }
            StatusOutcome::NoPlan { message } => {
                self.renderer.add_message(&message, Sender::System);
                Ok(())
            }
            StatusOutcome::ServerError { message } => bail!("Server error: {message}"),
            StatusOutcome::Missing => bail!("No plan data received"),
            StatusOutcome::Unexpected { reason } => bail!("Unexpected status payload: {reason}"),
        }
    }

    /// Polls until the plan completes or the user interrupts.
    pub async fn watch(&self) -> Result<()> {
        self.client.controller().start();
        self.wait_until_stopped().await
    }

    /// Reads queries from stdin, one per line, until EOF or `exit`.
    pub async fn interactive(&self) -> Result<()> {
        self.renderer.add_message(WELCOME_MESSAGE, Sender::System);
        self.renderer.set_input_enabled(true);

        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line.context("Failed to read from stdin")?,
                _ = signal::ctrl_c() => {
                    info!("Interrupted");
                    None
                }
            };
            let Some(line) = line else {
                break;
            };

            match line.trim() {
                "exit" | "quit" => break,
                "" => self.renderer.set_input_enabled(true),
                query => {
                    if self.send_interruptibly(query).await.is_none() {
                        break;
                    }
                }
            }
        }

        self.client.controller().stop();
        Ok(())
    }

    /// Sends one query. Returns `None` if Ctrl-C arrived first, in which
    /// case the request is dropped and polling is stopped.
    async fn send_interruptibly(&self, query: &str) -> Option<SendOutcome> {
        tokio::select! {
            outcome = self.client.chat().handle_send_message(query) => Some(outcome),
            _ = signal::ctrl_c() => {
                info!("Interrupted, abandoning the chat request");
                self.client.controller().stop();
                None
            }
        }
    }

    async fn wait_until_stopped(&self) -> Result<()> {
        let controller = self.client.controller();
        let mut phase = controller.subscribe();

        tokio::select! {
            stopped = phase.wait_for(|phase| *phase == PollPhase::Stopped) => {
                stopped.map(|_| ()).context("Polling controller went away")?;
            }
            _ = signal::ctrl_c() => {
                info!("Interrupted, stopping status checks");
                controller.stop();
            }
        }
        Ok(())
    }
}
