//! Request-scoped context handed to every stage and resolve handler.

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::HttpConfig;
use crate::handlers::HandlerError;

/// Utilities supplied by the runtime to addon handlers.
///
/// Cheap to clone; one context is created per incoming request and shared
/// across every handler invocation that request triggers. The cancellation
/// token is checked by the resolution engine between chain steps, so
/// raising it stops further resolution work.
#[derive(Clone)]
pub struct RequestContext {
    http: reqwest::Client,
    request_id: Uuid,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            // Time-sortable ids keep request logs groupable and ordered.
            request_id: Uuid::now_v7(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Builder: attach an externally supplied cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// The shared outbound HTTP client, for handlers with needs beyond the
    /// fetch helpers.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Fetch a remote page as text. Non-2xx statuses are errors.
    pub async fn fetch_text(&self, url: &str) -> Result<String, HandlerError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Fetch a remote resource as raw bytes. Non-2xx statuses are errors.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Bytes, HandlerError> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id)
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Build the shared outbound client from `[http]` configuration.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .user_agent(&config.user_agent)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contexts_get_distinct_request_ids() {
        let client = reqwest::Client::new();
        let a = RequestContext::new(client.clone());
        let b = RequestContext::new(client);
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn cancellation_token_is_carried() {
        let token = CancellationToken::new();
        let ctx = RequestContext::new(reqwest::Client::new())
            .with_cancellation(token.clone());

        assert!(!ctx.cancellation().is_cancelled());
        token.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }

    #[test]
    fn client_builds_from_default_config() {
        let config = HttpConfig::default();
        assert!(build_http_client(&config).is_ok());
    }
}
