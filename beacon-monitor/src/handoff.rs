//! Result handoff
//!
//! Performs the single result fetch that follows a successful analysis.

use beacon_core::domain::job::{JobKind, JobRequest};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::JobError;
use crate::repository::JobRepository;

/// Fetches the output of a finished job
///
/// Only analyses have a separate result route; a backtest has nothing to fetch
/// and asking for one is reported as a retrieval failure.
pub async fn fetch_output(
    repository: &dyn JobRepository,
    request: &JobRequest,
) -> Result<JsonValue, JobError> {
    let JobKind::Analysis(variant) = request.kind else {
        warn!("No result route for {} jobs", request.kind);
        return Err(JobError::ResultFetch { kind: request.kind });
    };

    match repository.fetch_result(&request.ticker, variant).await {
        Ok(data) => {
            info!("Fetched {} result for {}", variant, request.ticker);
            Ok(data)
        }
        Err(e) => {
            warn!("Job succeeded but its result could not be fetched: {:#}", e);
            Err(JobError::ResultFetch { kind: request.kind })
        }
    }
}
