use std::time::{Duration, Instant};

use reqwest::header::AUTHORIZATION;

use crate::services::provider::ResolvedProvider;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Unknown,
    Testing,
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
}

impl From<&ResolvedProvider> for ProbeTarget {
    fn from(p: &ResolvedProvider) -> Self {
        Self {
            name: p.name.clone(),
            base_url: p.base_url.clone(),
            api_key: p.api_key.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionResult {
    pub name: String,
    pub status: ConnectionStatus,
    pub latency: Option<Duration>,
    pub http_status: Option<u16>,
    pub error: Option<String>,
    /// Set for 401/403: the endpoint answered but the key may be wrong.
    pub hint: Option<String>,
}

impl ConnectionResult {
    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ConnectionStatus::Error,
            latency: None,
            http_status: None,
            error: Some(error.into()),
            hint: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    /// Reachable, but the server rejected the credential.
    CredentialRejected,
    Unreachable,
}

/// 2xx/3xx plus 401/403/404 count as reachable. Chat-completion endpoints
/// commonly answer a bare GET with one of those; 404 can also mean a wrong
/// path, so this is only a liveness estimate.
pub fn classify_status(code: u16) -> Reachability {
    match code {
        200..=399 | 404 => Reachability::Reachable,
        401 | 403 => Reachability::CredentialRejected,
        _ => Reachability::Unreachable,
    }
}

pub struct ProbeService;

impl ProbeService {
    /// Never fails: transport errors and bad statuses come back as `Error`.
    pub async fn test_connection(target: ProbeTarget) -> ConnectionResult {
        Self::test_connection_with_timeout(target, PROBE_TIMEOUT).await
    }

    pub async fn test_connection_with_timeout(
        target: ProbeTarget,
        timeout: Duration,
    ) -> ConnectionResult {
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => return ConnectionResult::failed(target.name, e.to_string()),
        };

        log::debug!("probing '{}' at {}", target.name, target.base_url);
        let started = Instant::now();
        let response = client
            .get(&target.base_url)
            .header(AUTHORIZATION, format!("Bearer {}", target.api_key))
            .send()
            .await;
        let latency = started.elapsed();

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                let message = if e.is_timeout() {
                    format!("timed out after {}s", timeout.as_secs())
                } else {
                    e.to_string()
                };
                log::debug!("probe '{}' failed: {message}", target.name);
                return ConnectionResult::failed(target.name, message);
            }
        };

        let code = response.status().as_u16();
        log::debug!("probe '{}' -> HTTP {code} in {latency:?}", target.name);
        let mut result = ConnectionResult {
            name: target.name,
            status: ConnectionStatus::Ok,
            latency: Some(latency),
            http_status: Some(code),
            error: None,
            hint: None,
        };
        match classify_status(code) {
            Reachability::Reachable => {}
            Reachability::CredentialRejected => {
                result.hint = Some(format!("HTTP {code}: API key may be invalid"));
            }
            Reachability::Unreachable => {
                result.status = ConnectionStatus::Error;
                result.error = Some(format!("HTTP {code}"));
            }
        }
        result
    }
}
