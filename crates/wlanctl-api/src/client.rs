// Platform HTTP client
//
// Wraps `reqwest::Client` with bearer-token auth, segment-safe URL
// construction and response classification. Endpoint families
// (configuration, exec, monitoring) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::response::{CentralResponse, preview};
use crate::transport::TransportConfig;

/// Raw HTTP client for the management platform.
///
/// Every request carries the bearer token; every response passes through
/// [`CentralResponse::classify`] before the caller sees it.
pub struct CentralClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    timeout: Option<Duration>,
}

impl CentralClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the regional API gateway root, e.g.
    /// `https://apigw-prod2.central.arubanetworks.com`.
    pub fn new(base_url: Url, token: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, token).with_timeout(transport.timeout))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
            timeout: None,
        }
    }

    /// Record the request timeout the underlying client enforces, so a
    /// timed-out request reports it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The platform base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL.
    ///
    /// Segments are percent-encoded individually, so group names containing
    /// spaces or slashes stay a single segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::CannotBeABase {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Like [`endpoint`](Self::endpoint), with query pairs appended.
    pub(crate) fn endpoint_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, Error> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and classify the response.
    pub(crate) async fn get(&self, url: Url) -> Result<CentralResponse, Error> {
        debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    /// Send a POST request with a JSON body and classify the response.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<CentralResponse, Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url).json(body)).await
    }

    /// Send a PUT request with a JSON body and classify the response.
    pub(crate) async fn put(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<CentralResponse, Error> {
        debug!("PUT {}", url);
        self.send(self.http.put(url).json(body)).await
    }

    /// GET and decode a successful body as JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let body = self.get(url).await?.into_result()?;
        decode(&body)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<CentralResponse, Error> {
        let resp = builder
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(status, len = body.len(), "response received");
        Ok(CentralResponse::classify(status, body))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if e.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(e),
        }
    }
}

/// Decode a JSON body, keeping a preview of the raw text on failure.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}
