//! Shared HTTP transport.
//!
//! One `Transport` is built per [`ConnectClient`](crate::ConnectClient) and
//! shared by every API accessor. It owns everything that must be identical
//! across resource types: base endpoint, headers, credentials, timeout and
//! retry policy.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::BasicAuth;
use crate::error::{Error, Result};
use crate::retry::{AttemptOutcome, RetryPolicy, TransportFailure};

/// Request executor shared by all API accessors.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
    basic_auth: Option<BasicAuth>,
    timeout: Duration,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: Url,
        headers: HeaderMap,
        basic_auth: Option<BasicAuth>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http,
            base_url,
            headers,
            basic_auth,
            timeout,
            retry,
        }
    }

    /// Base endpoint every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Full URL for `path`.
    ///
    /// This is plain concatenation onto the base: no separator is inserted or
    /// collapsed, so callers pass paths without a leading `/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str(), path)
    }

    /// Send a request and decode the JSON response into `T`.
    pub async fn execute<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(method, path, body).await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Send a request whose response content is ignored.
    pub async fn execute_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body).await.map(|_| ())
    }

    /// Run the attempt loop and return the body of the final response.
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Bytes>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(&self.url(path))?;
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Encode)?
            .map(Bytes::from);

        let mut retries = 0;
        loop {
            let result = self.attempt(&method, &url, payload.clone()).await;

            let outcome = match &result {
                Ok((status, _)) => AttemptOutcome::Status(*status),
                Err(e) => AttemptOutcome::Transport(TransportFailure::classify(e)),
            };

            if self.retry.should_retry(&outcome, retries) {
                retries += 1;
                let wait = self.retry.backoff(retries);
                tracing::warn!(
                    method = %method,
                    url = %url,
                    attempt = retries,
                    max_retries = self.retry.retries(),
                    backoff_ms = wait.as_millis() as u64,
                    outcome = ?outcome,
                    "Request failed, retrying"
                );
                tokio::time::sleep(wait).await;
                continue;
            }

            let (status, bytes) = result?;
            if status.as_u16() >= 400 {
                return Err(Error::Api {
                    method,
                    url: url.to_string(),
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
            return Ok(bytes);
        }
    }

    /// One round-trip, including reading the body.
    async fn attempt(
        &self,
        method: &Method,
        url: &Url,
        payload: Option<Bytes>,
    ) -> std::result::Result<(StatusCode, Bytes), reqwest::Error> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(self.headers.clone())
            .timeout(self.timeout);

        if let Some(auth) = &self.basic_auth {
            request = request.basic_auth(&auth.username, auth.password.as_ref());
        }

        if let Some(payload) = payload {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload);
        }

        tracing::debug!(method = %method, url = %url, "Sending request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            "Received response"
        );

        Ok((status, bytes))
    }
}
