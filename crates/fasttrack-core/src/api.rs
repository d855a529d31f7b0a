//! Fast-logging API client.
//!
//! One fire-and-forget POST per completed fast. The request carries a hard
//! timeout; the caller maps the three failure shapes (transport, timeout,
//! non-2xx) to distinct user-facing messages.

use std::time::Duration;

use serde::Serialize;

use crate::error::{CoreError, SaveError};
use crate::storage::Config;
use crate::timer::CompletedFast;

/// Wire body for `POST /api/fasts`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FastPayload<'a> {
    start_time: i64,
    end_time: i64,
    actual_duration_seconds: u64,
    goal_duration_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

/// HTTP client for the fast-logging endpoint.
pub struct FastLogClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl FastLogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Custom(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Self::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    /// Log a completed fast. Notes are attached only here, at save time.
    ///
    /// Any 2xx status is success. Everything else maps onto the
    /// [`SaveError`] taxonomy so the UI can distinguish a timeout from a
    /// generic failure.
    pub async fn log_fast(
        &self,
        fast: &CompletedFast,
        notes: Option<&str>,
    ) -> Result<(), SaveError> {
        let payload = FastPayload {
            start_time: fast.start_time,
            end_time: fast.end_time,
            actual_duration_seconds: fast.actual_duration_seconds,
            goal_duration_seconds: fast.goal_duration_seconds,
            notes,
        };
        let url = format!("{}/api/fasts", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SaveError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    SaveError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SaveError::Server {
                status: status.as_u16(),
            })
        }
    }
}
