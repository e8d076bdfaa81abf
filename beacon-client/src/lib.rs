//! Beacon HTTP Client
//!
//! A small, type-safe HTTP client for the stock analysis backend.
//!
//! The backend exposes three kinds of endpoints the job monitor relies on:
//! job submission, task status, and result retrieval. This crate wraps each of
//! them in a typed method.
//!
//! # Example
//!
//! ```no_run
//! use beacon_client::BackendClient;
//! use beacon_core::domain::job::{AnalysisVariant, JobRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), beacon_client::ClientError> {
//!     let client = BackendClient::new("http://localhost:5000");
//!
//!     let answer = client
//!         .submit(&JobRequest::analysis("AAPL", AnalysisVariant::Simple))
//!         .await?;
//!
//!     println!("Started task: {:?}", answer.task_id());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod results;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the analysis backend
///
/// Methods are organized into two groups:
/// - Job lifecycle (submit, poll status)
/// - Result retrieval
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:5000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:5000")
    ///
    /// # Example
    /// ```
    /// use beacon_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://localhost:5000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use beacon_client::BackendClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BackendClient::with_client("http://localhost:5000", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle a backend response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! In-process stand-in for the analysis backend

    use axum::Router;

    /// Serves `router` on an ephemeral local port and returns its base URL
    pub async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = BackendClient::new("http://localhost:5000");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BackendClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = BackendClient::with_client("http://localhost:5000", http_client);
        assert_eq!(client.base_url(), "http://localhost:5000");
    }
}
