//! Result retrieval endpoints

use crate::BackendClient;
use crate::error::Result;
use beacon_core::domain::job::AnalysisVariant;

impl BackendClient {
    // =============================================================================
    // Results
    // =============================================================================

    /// Fetch the stored output of a finished analysis
    ///
    /// Simple analyses are served from `/data/{ticker}`, hybrid ones from
    /// `/hybrid_data/{ticker}`.
    ///
    /// # Returns
    /// The raw JSON payload
    pub async fn fetch_result(
        &self,
        ticker: &str,
        variant: AnalysisVariant,
    ) -> Result<serde_json::Value> {
        let url = match variant {
            AnalysisVariant::Simple => format!("{}/data/{}", self.base_url, ticker),
            AnalysisVariant::Hybrid => format!("{}/hybrid_data/{}", self.base_url, ticker),
        };
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
