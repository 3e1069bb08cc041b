//! # Connect
//!
//! Outbound REST infrastructure shared by every vendor integration. Each
//! slice builds a [`RestClient`] for its vendor (base URL + bearer token) and
//! exchanges JSON bodies; flaky endpoints wrap their calls in
//! [`retry_with_backoff`].
//!
//! ## Example
//! ```rust,no_run
//! use brigade_connect::RestClient;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), brigade_connect::ConnectError> {
//! let stripe = RestClient::builder("stripe", "https://api.stripe.com/v1")
//!     .bearer("sk_test_...")
//!     .build()?;
//!
//! let subs: serde_json::Value =
//!     stripe.get_json("/subscriptions?customer=cus_123").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod retry;

pub use error::ConnectError;
pub use retry::{BackoffPolicy, retry_with_backoff};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A thin JSON client bound to one vendor's API.
#[derive(Debug, Clone)]
pub struct RestClient {
    service: &'static str,
    base_url: String,
    bearer: Option<String>,
    client: Client,
}

/// Builder for [`RestClient`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct RestClientBuilder {
    service: &'static str,
    base_url: String,
    bearer: Option<String>,
    timeout: Duration,
}

impl RestClientBuilder {
    /// Sets the bearer token sent in the `Authorization` header.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Overrides the per-request timeout (default 30s).
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    /// Returns [`ConnectError::InvalidConfiguration`] when the base URL is
    /// empty or the underlying client cannot be constructed.
    pub fn build(self) -> Result<RestClient, ConnectError> {
        if self.base_url.is_empty() {
            return Err(ConnectError::InvalidConfiguration(format!(
                "{} base URL is empty",
                self.service
            )));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ConnectError::InvalidConfiguration(e.to_string()))?;

        Ok(RestClient {
            service: self.service,
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            bearer: self.bearer,
            client,
        })
    }
}

impl RestClient {
    /// Starts a builder for the named vendor rooted at `base_url`.
    pub fn builder(service: &'static str, base_url: impl Into<String>) -> RestClientBuilder {
        RestClientBuilder {
            service,
            base_url: base_url.into(),
            bearer: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The vendor name this client talks to.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// Issues a GET and decodes the JSON response body.
    ///
    /// # Errors
    /// [`ConnectError::Network`] on transport failure, [`ConnectError::Status`]
    /// on non-2xx responses, [`ConnectError::Decode`] on body mismatch.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConnectError> {
        let url = self.url(path);
        debug!(service = self.service, %url, "GET");

        let request = self.authorize(self.client.get(&url));
        let response = request
            .send()
            .await
            .map_err(|e| ConnectError::Network { url: url.clone(), message: e.to_string() })?;

        self.decode(response).await
    }

    /// Issues a POST with a JSON body and decodes the JSON response.
    ///
    /// # Errors
    /// Same classification as [`RestClient::get_json`].
    pub async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ConnectError> {
        let url = self.url(path);
        debug!(service = self.service, %url, "POST");

        let request =
            self.authorize(self.client.post(&url)).header(CONTENT_TYPE, "application/json");
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| ConnectError::Network { url: url.clone(), message: e.to_string() })?;

        self.decode(response).await
    }

    /// Issues a POST with a form-encoded body (Stripe's dialect) and decodes
    /// the JSON response.
    ///
    /// # Errors
    /// Same classification as [`RestClient::get_json`].
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ConnectError> {
        let url = self.url(path);
        debug!(service = self.service, %url, "POST (form)");

        let request = self.authorize(self.client.post(&url));
        let response = request
            .form(fields)
            .send()
            .await
            .map_err(|e| ConnectError::Network { url: url.clone(), message: e.to_string() })?;

        self.decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.bearer {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ConnectError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectError::Status {
                service: self.service.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| ConnectError::Decode {
            service: self.service.to_owned(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_normalizes_base_url() {
        let client = RestClient::builder("stripe", "https://api.stripe.com/v1/").build().unwrap();
        assert_eq!(client.url("/subscriptions"), "https://api.stripe.com/v1/subscriptions");
        assert_eq!(client.url("subscriptions"), "https://api.stripe.com/v1/subscriptions");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = RestClient::builder("gusto", "").build().unwrap_err();
        assert!(matches!(err, ConnectError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_bearer_is_dropped() {
        let client = RestClient::builder("resend", "https://api.resend.com")
            .bearer(String::new())
            .build()
            .unwrap();
        assert!(client.bearer.is_none());
    }
}
