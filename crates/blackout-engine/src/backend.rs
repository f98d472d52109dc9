//! The persistence service seam.
//!
//! [`AvailabilityBackend`] is what the session submits through. The HTTP
//! implementation talks to the availability service:
//!
//! - `POST {endpoint}/availability` with a [`SaveRequest`] body, answered by a
//!   [`SaveAck`];
//! - `GET {endpoint}/availability`, answered by an
//!   [`AvailabilityList`](crate::submission::AvailabilityList) sorted
//!   newest first.

use async_trait::async_trait;

use crate::error::Result;
use crate::submission::{SaveAck, SaveRequest, StoredAvailability};

#[cfg(feature = "http")]
pub use http::HttpBackend;

#[async_trait]
pub trait AvailabilityBackend: Sync {
    /// Persist one submission.
    ///
    /// # Errors
    /// Implementations return `BlackoutError::SubmissionFailed` when the
    /// service rejects the request or cannot be reached.
    async fn save(&self, request: &SaveRequest) -> Result<SaveAck>;

    /// Fetch previously stored submissions, most recent first.
    ///
    /// # Errors
    /// Implementations return `BlackoutError::FetchFailed` on any failure.
    async fn list(&self) -> Result<Vec<StoredAvailability>>;
}

#[cfg(feature = "http")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use tracing::{info, instrument};

    use super::AvailabilityBackend;
    use crate::config::SessionConfig;
    use crate::error::{BlackoutError, Result};
    use crate::submission::{AvailabilityList, SaveAck, SaveRequest, StoredAvailability};

    const TIMEOUT: Duration = Duration::from_secs(10);

    /// `reqwest`-based client for the availability service.
    pub struct HttpBackend {
        client: Client,
        endpoint: String,
    }

    impl HttpBackend {
        /// Build a client for the service rooted at `endpoint`
        /// (e.g. `http://localhost:8000`).
        ///
        /// # Errors
        /// Returns `BlackoutError::Config` if the HTTP client cannot be built.
        pub fn try_new(endpoint: impl Into<String>) -> Result<Self> {
            let client = Client::builder()
                .timeout(TIMEOUT)
                .build()
                .map_err(|e| BlackoutError::Config(format!("failed to build HTTP client: {}", e)))?;
            Ok(Self {
                client,
                endpoint: endpoint.into(),
            })
        }

        /// Build a client for the service named by `config.endpoint`.
        ///
        /// # Errors
        /// Returns `BlackoutError::Config` if the endpoint is blank or the HTTP
        /// client cannot be built.
        pub fn from_config(config: &SessionConfig) -> Result<Self> {
            if config.endpoint.trim().is_empty() {
                return Err(BlackoutError::Config("endpoint must not be empty".to_string()));
            }
            Self::try_new(config.endpoint.trim())
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }

        fn url(&self) -> String {
            format!("{}/availability", self.endpoint.trim_end_matches('/'))
        }
    }

    #[async_trait]
    impl AvailabilityBackend for HttpBackend {
        #[instrument(skip_all, fields(n_intervals = request.unavailable_dates.len()))]
        async fn save(&self, request: &SaveRequest) -> Result<SaveAck> {
            info!("Saving…");
            let ack = self
                .client
                .post(self.url())
                .json(request)
                .send()
                .await
                .map_err(|e| BlackoutError::SubmissionFailed(format!("failed to call: {}", e)))?
                .error_for_status()
                .map_err(|e| BlackoutError::SubmissionFailed(format!("request failed: {}", e)))?
                .json::<SaveAck>()
                .await
                .map_err(|e| {
                    BlackoutError::SubmissionFailed(format!("failed to deserialize the response: {}", e))
                })?;
            info!(response = %ack.message, "Saved");
            Ok(ack)
        }

        #[instrument(skip_all)]
        async fn list(&self) -> Result<Vec<StoredAvailability>> {
            info!("Fetching…");
            let list = self
                .client
                .get(self.url())
                .send()
                .await
                .map_err(|e| BlackoutError::FetchFailed(format!("failed to call: {}", e)))?
                .error_for_status()
                .map_err(|e| BlackoutError::FetchFailed(format!("request failed: {}", e)))?
                .json::<AvailabilityList>()
                .await
                .map_err(|e| {
                    BlackoutError::FetchFailed(format!("failed to deserialize the response: {}", e))
                })?;
            info!(n_availabilities = list.availabilities.len(), "Fetched");
            Ok(list.availabilities)
        }
    }
}
