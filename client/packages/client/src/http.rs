use agent_console_error::ConsoleError;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;

/// Thin reqwest wrapper that applies bearer auth and normalizes every
/// response through the `{error}` body convention.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

pub(crate) struct RawResponse {
    pub status: u16,
    pub text: String,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConsoleError> {
        // Timeouts are left to the transport defaults.
        let client = Client::builder().build().map_err(transport_error)?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url(path);
        self.authorize(self.client.request(method, url))
    }

    /// Builds the url from raw segments so identifiers are percent-encoded.
    pub(crate) fn request_segments(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.config.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        self.authorize(self.client.request(method, url))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn send_raw(&self, request: RequestBuilder) -> Result<RawResponse, ConsoleError> {
        let response = request.send().await.map_err(|err| {
            tracing::warn!(error = %err, "request failed before a response arrived");
            transport_error(err)
        })?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        tracing::debug!(status, "response received");
        Ok(RawResponse { status, text })
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ConsoleError> {
        let raw = self.send_raw(request).await?;
        if let Some(err) = ConsoleError::from_response_body(raw.status, &raw.text) {
            return Err(err);
        }
        decode(&raw.text)
    }

    /// For calls whose success body carries nothing the caller needs.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ConsoleError> {
        let raw = self.send_raw(request).await?;
        match ConsoleError::from_response_body(raw.status, &raw.text) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ConsoleError> {
    serde_json::from_str(text).map_err(|err| ConsoleError::invalid_response(err.to_string()))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ConsoleError {
    ConsoleError::transport(err.status().map(|status| status.as_u16()), err.to_string())
}
