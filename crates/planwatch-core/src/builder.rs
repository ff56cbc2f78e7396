//! Builder for creating and wiring a planwatch client.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    chat::ChatRequestHandler,
    config::ClientConfig,
    endpoints::Endpoints,
    error::Result,
    fallback::FallbackRequestClient,
    polling::PollingController,
    render::Renderer,
    transport::{HttpTransport, ReqwestTransport},
};

/// A wired client: the polling controller and the chat handler sharing one
/// renderer and one transport.
pub struct Client {
    chat: ChatRequestHandler,
}

impl Client {
    pub fn chat(&self) -> &ChatRequestHandler {
        &self.chat
    }

    pub fn controller(&self) -> &PollingController {
        self.chat.controller()
    }
}

/// Builder for creating and configuring [`Client`] instances.
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    config_path: Option<PathBuf>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `config` as-is, skipping any config file.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a custom config file path.
    ///
    /// If not specified, uses `$XDG_CONFIG_HOME/planwatch/config.json` when
    /// it exists and the built-in defaults otherwise.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.config_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Replaces the HTTP transport, mainly for tests.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client around `renderer`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::FileSystem` or `ClientError::Serialization` if
    /// the config file cannot be loaded, `ClientError::InvalidUrl` if the
    /// endpoints are malformed, and `ClientError::Configuration` for invalid
    /// polling settings or an HTTP client that fails to initialise.
    pub fn build(self, renderer: Arc<dyn Renderer>) -> Result<Client> {
        let config = match self.config {
            Some(config) => config,
            None => ClientConfig::load(self.config_path.as_deref())?,
        };
        config.polling.validate()?;

        let endpoints = Endpoints::from_config(&config.endpoints)?;
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let client = FallbackRequestClient::new(transport);

        let controller = PollingController::new(
            client.clone(),
            endpoints.status_urls(),
            config.polling,
            Arc::clone(&renderer),
        );
        let chat = ChatRequestHandler::new(
            &client,
            endpoints,
            controller,
            renderer,
            &config.chat,
        );

        Ok(Client { chat })
    }
}
