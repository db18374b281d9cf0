//! HTTP reachability check (reqwest).

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};

use super::traits::ReachabilityCheck;
use crate::{Result, SigilError};

/// Default `User-Agent` sent with reachability checks.
pub const DEFAULT_USER_AGENT: &str = concat!("sigil/", env!("CARGO_PKG_VERSION"));

/// Checks remote assets with `HEAD`, falling back to `GET` for servers
/// that reject `HEAD` with 405. Any 2xx or 3xx status counts as reachable.
///
/// Per-attempt timeouts are applied by the [`Prober`](super::Prober), not
/// by the client.
#[derive(Debug, Clone)]
pub struct HttpReachability {
    client: Client,
}

impl HttpReachability {
    /// Create a check with the default user agent.
    pub fn new() -> Result<Self> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Create a check with a custom user agent.
    pub fn with_user_agent(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| SigilError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn status(&self, method: Method, location: &str) -> Result<StatusCode> {
        let response = self.client.request(method, location).send().await?;
        Ok(response.status())
    }
}

#[async_trait]
impl ReachabilityCheck for HttpReachability {
    fn name(&self) -> &str {
        "http"
    }

    async fn check(&self, location: &str) -> Result<()> {
        let mut status = self.status(Method::HEAD, location).await?;
        if status == StatusCode::METHOD_NOT_ALLOWED {
            status = self.status(Method::GET, location).await?;
        }
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(SigilError::Unreachable {
                status: status.as_u16(),
            })
        }
    }
}
