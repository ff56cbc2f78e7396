//! Candidate URL construction for the backend endpoints.

use url::Url;

use crate::{
    config::EndpointConfig,
    error::{ClientError, Result},
};

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/manus/chat";

/// Path of the plan status endpoint.
pub const STATUS_PATH: &str = "/manus/status";

/// Resolved base URLs, most specific first.
#[derive(Debug, Clone)]
pub struct Endpoints {
    configured: Url,
    origin: Option<Url>,
    fallback: Url,
}

impl Endpoints {
    /// Resolves the base URLs described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` if the configured host or origin do
    /// not form valid URLs.
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        let configured = parse_url(&format!(
            "{}://{}:{}",
            config.scheme, config.host, config.port
        ))?;
        let origin = config.origin.as_deref().map(parse_url).transpose()?;

        let fallback_host = origin
            .as_ref()
            .and_then(Url::host_str)
            .unwrap_or(config.host.as_str());
        let fallback = parse_url(&format!("http://{fallback_host}:{}", config.fallback_port))?;

        Ok(Self {
            configured,
            origin,
            fallback,
        })
    }

    /// Candidate URLs for `path`, in priority order, without duplicates.
    ///
    /// The order is: configured base, page origin, the bare path resolved
    /// against the origin, and the literal fallback host and port.
    pub fn candidates(&self, path: &str) -> Vec<Url> {
        let mut urls = vec![join(&self.configured, path)];
        if let Some(origin) = &self.origin {
            urls.push(join_origin(origin, path));
            urls.push(join(origin, path));
        }
        urls.push(join(&self.fallback, path));

        let mut unique: Vec<Url> = Vec::with_capacity(urls.len());
        for url in urls {
            if !unique.contains(&url) {
                unique.push(url);
            }
        }
        unique
    }

    /// Status endpoint candidates.
    pub fn status_urls(&self) -> Vec<String> {
        self.candidates(STATUS_PATH)
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Chat endpoint candidates carrying the url-encoded `query`.
    pub fn chat_urls(&self, query: &str) -> Vec<String> {
        self.candidates(CHAT_PATH)
            .into_iter()
            .map(|mut url| {
                url.query_pairs_mut().append_pair("query", query);
                String::from(url)
            })
            .collect()
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Appends `path` below whatever path `base` already has.
fn join_origin(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}{path}"));
    url.set_query(None);
    url
}

/// Resolves `path` as an absolute-path reference against `base`.
fn join(base: &Url, path: &str) -> Url {
    base.join(path).unwrap_or_else(|_| join_origin(base, path))
}
