//! HTTP client for the fleet controller

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use fleetmon_core::prelude::*;

use crate::routes::Route;

/// Default number of attempts for readiness polling
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Default spacing between readiness polls
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// How long to keep polling an endpoint that is not ready yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Run `attempt` until its value satisfies `predicate`.
///
/// Failed attempts (transport or parse errors) count towards the budget
/// like unsatisfied ones. Attempts are spaced by `policy.delay`; there is
/// no wait after the last one.
pub async fn retry_until<T, F, Fut, P>(
    label: &str,
    policy: &RetryPolicy,
    mut attempt: F,
    predicate: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: Fn(&T) -> bool,
{
    for n in 1..=policy.max_attempts {
        match attempt().await {
            Ok(value) if predicate(&value) => {
                debug!("{label} ready after {n} attempt(s)");
                return Ok(value);
            }
            Ok(_) => trace!("{label} not ready (attempt {n}/{})", policy.max_attempts),
            Err(e) => debug!("{label} attempt {n}/{} failed: {e}", policy.max_attempts),
        }
        if n < policy.max_attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    Err(Error::retry_exhausted(label, policy.max_attempts))
}

/// Thin wrapper over `reqwest` bound to one controller base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout.
    ///
    /// Only absolute `http`/`https` URLs are accepted.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed =
            Url::parse(base_url).map_err(|e| Error::invalid_url(base_url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::invalid_url(
                base_url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, route: &Route) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    /// GET `route` and parse the body as `T`
    pub async fn fetch_json<T: DeserializeOwned>(&self, route: &Route) -> Result<T> {
        let url = self.url_for(route);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::network(&url, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::network(&url, format!("HTTP {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::network(&url, e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| Error::parse(&url, e.to_string()))
    }

    /// Issue a command without waiting on its outcome. Failures are logged
    /// and otherwise ignored.
    pub async fn fire_and_forget(&self, route: &Route) {
        let url = self.url_for(route);
        match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => trace!("sent {route}"),
            Ok(resp) => warn!("command {route} answered HTTP {}", resp.status()),
            Err(e) => warn!("command {route} failed: {e}"),
        }
    }

    /// Poll `route` until `predicate` accepts the parsed body
    pub async fn fetch_json_until<T, P>(
        &self,
        route: &Route,
        predicate: P,
        policy: &RetryPolicy,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let url = self.url_for(route);
        retry_until(&url, policy, || self.fetch_json::<T>(route), predicate).await
    }
}
