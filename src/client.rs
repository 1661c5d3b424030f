// HTTP client for querying the agent

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::CheckError;
use crate::models::ErrorBody;

/// Thin wrapper over reqwest with the check's timeout applied to the whole
/// request. The agent speaks plain HTTP on the monitoring network.
pub struct AgentClient {
    base: String,
    http: reqwest::Client,
}

impl AgentClient {
    pub fn new(hostname: &str, port: u16, timeout: Duration) -> Result<Self, CheckError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckError::Transport(e.to_string()))?;
        Ok(Self {
            base: format!("http://{hostname}:{port}"),
            http,
        })
    }

    /// Fetches one agent path and decodes the success shape. A non-200 with
    /// the `{error}` body is the agent reporting its own failure; any other
    /// non-200 or an undecodable body is a transport error.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, CheckError> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(url = %url, "querying agent");
        let response = self.http.get(&url).send().await.map_err(map_reqwest)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest)?;
        tracing::debug!(status = %status, bytes = body.len(), "agent answered");

        if status.is_success() {
            return serde_json::from_slice(&body)
                .map_err(|e| CheckError::Transport(format!("decoding {url}: {e}")));
        }
        match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(agent_error) => Err(CheckError::Agent(agent_error.error)),
            Err(_) => Err(CheckError::Transport(format!(
                "unexpected status {status} from {url}"
            ))),
        }
    }
}

fn map_reqwest(e: reqwest::Error) -> CheckError {
    if e.is_timeout() {
        CheckError::Timeout
    } else {
        CheckError::Transport(e.to_string())
    }
}
