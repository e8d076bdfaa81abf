//! Jobs repository
//!
//! Handles communication with the backend for job-related operations:
//! - Submitting jobs
//! - Fetching task status
//! - Fetching the stored result of a finished analysis

use anyhow::{Context, Result};
use async_trait::async_trait;
use beacon_client::BackendClient;
use beacon_core::domain::job::{AnalysisVariant, JobRequest};
use beacon_core::dto::job::{StatusResponse, SubmitResponse};
use reqwest::Client;

use crate::config::MonitorConfig;

/// Repository trait for job-related operations with the backend
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Submits a job
    ///
    /// Returns either a task identifier, an immediate result, or a
    /// server-reported rejection. `Err` means no structured answer was
    /// obtained (transport failure, unexpected status, undecodable body).
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse>;

    /// Fetches the current status of a task
    ///
    /// # Arguments
    /// * `task_id` - The identifier returned by `submit`
    async fn poll_status(&self, task_id: &str) -> Result<StatusResponse>;

    /// Fetches the stored output of a finished analysis
    ///
    /// # Arguments
    /// * `ticker` - The analysed ticker symbol
    /// * `variant` - Selects the result route
    async fn fetch_result(&self, ticker: &str, variant: AnalysisVariant)
    -> Result<serde_json::Value>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: BackendClient,
}

impl HttpJobRepository {
    /// Creates a repository over an existing client
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Creates a repository from monitor configuration
    ///
    /// Applies `request_timeout` to every HTTP call when set.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::new(BackendClient::with_client(
            config.backend_url.clone(),
            http,
        )))
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn submit(&self, request: &JobRequest) -> Result<SubmitResponse> {
        self.client
            .submit(request)
            .await
            .with_context(|| format!("Failed to submit {} job for {}", request.kind, request.ticker))
    }

    async fn poll_status(&self, task_id: &str) -> Result<StatusResponse> {
        self.client
            .poll_status(task_id)
            .await
            .with_context(|| format!("Failed to fetch status of task {}", task_id))
    }

    async fn fetch_result(
        &self,
        ticker: &str,
        variant: AnalysisVariant,
    ) -> Result<serde_json::Value> {
        self.client
            .fetch_result(ticker, variant)
            .await
            .with_context(|| format!("Failed to fetch {} result for {}", variant, ticker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JobMonitor, JobState};
    use axum::{
        Form, Json, Router,
        extract::Path,
        routing::{get, post},
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Backend whose task reports progress once, then succeeds
    async fn spawn_backend(polls: Arc<AtomicUsize>) -> String {
        let router = Router::new()
            .route(
                "/analyze",
                post(|Form(form): Form<HashMap<String, String>>| async move {
                    Json(json!({ "task_id": format!("task-{}", form["ticker"]) }))
                }),
            )
            .route(
                "/status/{id}",
                get(move |Path(_id): Path<String>| {
                    let polls = Arc::clone(&polls);
                    async move {
                        if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                            Json(json!({"state": "PROGRESS", "status": "Fetching stock data..."}))
                        } else {
                            Json(json!({"state": "SUCCESS", "status": ""}))
                        }
                    }
                }),
            )
            .route(
                "/data/{ticker}",
                get(|Path(ticker): Path<String>| async move {
                    Json(json!({"arima_plot": format!("<div>{}</div>", ticker), "sentiment": 0.1, "posts": []}))
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_from_config_with_request_timeout() {
        let mut config = MonitorConfig::default();
        config.request_timeout = Some(Duration::from_secs(10));
        assert!(HttpJobRepository::from_config(&config).is_ok());
    }

    #[tokio::test]
    async fn test_monitor_over_http() -> anyhow::Result<()> {
        let polls = Arc::new(AtomicUsize::new(0));
        let config = MonitorConfig::new(spawn_backend(Arc::clone(&polls)).await)
            .with_poll_interval(Duration::from_millis(20));
        let repository = Arc::new(HttpJobRepository::from_config(&config)?);
        let monitor = JobMonitor::new(repository, config)?;

        let state = monitor
            .run(JobRequest::analysis("aapl", AnalysisVariant::Simple))
            .await;

        assert_eq!(
            state,
            JobState::Succeeded(json!({"arima_plot": "<div>AAPL</div>", "sentiment": 0.1, "posts": []}))
        );
        assert_eq!(polls.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
