//! Job submission and status endpoints

use crate::BackendClient;
use crate::error::{ClientError, Result};
use beacon_core::domain::job::{JobKind, JobRequest};
use beacon_core::dto::job::{StatusResponse, SubmitResponse};
use tracing::debug;

impl BackendClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a job to the backend
    ///
    /// Analysis jobs go to `POST /analyze` with the variant as `analysis_type`;
    /// backtests go to `POST /api/backtest`. Both are form-encoded.
    ///
    /// A rejected request (non-2xx with an `error`/`message` body) is returned as
    /// a [`SubmitResponse`] carrying the rejection, not as an `Err`, so the caller
    /// can surface the backend's own wording.
    ///
    /// # Example
    /// ```no_run
    /// # use beacon_client::BackendClient;
    /// # use beacon_core::domain::job::JobRequest;
    /// # async fn example() -> beacon_client::Result<()> {
    /// let client = BackendClient::new("http://localhost:5000");
    /// let answer = client.submit(&JobRequest::backtest("MSFT")).await?;
    /// if let Some(reason) = answer.rejection() {
    ///     eprintln!("rejected: {}", reason);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse> {
        let response = match request.kind {
            JobKind::Analysis(variant) => {
                let url = format!("{}/analyze", self.base_url);
                self.client
                    .post(&url)
                    .form(&[
                        ("ticker", request.ticker.as_str()),
                        ("analysis_type", variant.as_str()),
                    ])
                    .send()
                    .await?
            }
            JobKind::Backtest => {
                let url = format!("{}/api/backtest", self.base_url);
                self.client
                    .post(&url)
                    .form(&[("ticker", request.ticker.as_str())])
                    .send()
                    .await?
            }
        };

        let status = response.status();
        if status.is_success() {
            return self.handle_response(response).await;
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match serde_json::from_str::<SubmitResponse>(&body) {
            Ok(answer) if answer.rejection().is_some() => {
                debug!("Submission rejected with status {}", status);
                Ok(answer)
            }
            _ => Err(ClientError::api_error(status.as_u16(), body)),
        }
    }

    /// Get the current status of a backend task
    ///
    /// # Arguments
    /// * `task_id` - Identifier returned by [`BackendClient::submit`]
    pub async fn poll_status(&self, task_id: &str) -> Result<StatusResponse> {
        let url = format!("{}/status/{}", self.base_url, task_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::spawn_backend;
    use axum::{
        Form, Json, Router,
        http::StatusCode,
        routing::{get, post},
    };
    use beacon_core::domain::job::AnalysisVariant;
    use beacon_core::domain::task::TaskState;
    use serde_json::json;
    use std::collections::HashMap;

    fn router() -> Router {
        Router::new()
            .route(
                "/analyze",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    let id = format!("{}-{}", form["ticker"], form["analysis_type"]);
                    Json(json!({ "task_id": id }))
                }),
            )
            .route(
                "/api/backtest",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    if form["ticker"] == "ZZZZ" {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({"error": "bad request", "message": "Invalid ticker symbol."})),
                        );
                    }
                    (StatusCode::OK, Json(json!({ "task_id": "bt-1" })))
                }),
            )
            .route(
                "/status/{id}",
                get(|axum::extract::Path(id): axum::extract::Path<String>| async move {
                    match id.as_str() {
                        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
                        _ => (
                            StatusCode::OK,
                            Json(json!({"state": "PROGRESS", "status": "Fetching stock data..."})),
                        ),
                    }
                }),
            )
    }

    #[tokio::test]
    async fn test_submit_analysis_sends_variant() -> anyhow::Result<()> {
        let client = BackendClient::new(spawn_backend(router()).await);

        let answer = client
            .submit(&JobRequest::analysis("aapl", AnalysisVariant::Hybrid))
            .await?;

        assert_eq!(answer.task_id(), Some("AAPL-hybrid"));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_backtest() -> anyhow::Result<()> {
        let client = BackendClient::new(spawn_backend(router()).await);

        let answer = client.submit(&JobRequest::backtest("MSFT")).await?;

        assert_eq!(answer.task_id(), Some("bt-1"));
        assert_eq!(answer.rejection(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_rejection_is_returned_as_payload() -> anyhow::Result<()> {
        let client = BackendClient::new(spawn_backend(router()).await);

        let answer = client.submit(&JobRequest::backtest("ZZZZ")).await?;

        assert_eq!(answer.task_id(), None);
        assert_eq!(answer.rejection().as_deref(), Some("Invalid ticker symbol."));
        Ok(())
    }

    #[tokio::test]
    async fn test_poll_status() -> anyhow::Result<()> {
        let client = BackendClient::new(spawn_backend(router()).await);

        let status = client.poll_status("t1").await?;

        assert_eq!(status.state, TaskState::Progress);
        assert_eq!(status.status.as_deref(), Some("Fetching stock data..."));
        Ok(())
    }

    #[tokio::test]
    async fn test_poll_status_server_error() {
        let client = BackendClient::new(spawn_backend(router()).await);

        let err = client.poll_status("broken").await.unwrap_err();

        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_failure() {
        // Nothing listens on port 9 locally
        let client = BackendClient::new("http://127.0.0.1:9");

        let err = client.submit(&JobRequest::backtest("MSFT")).await.unwrap_err();

        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
