//! Result payloads produced by finished jobs
//!
//! The monitor treats results as opaque JSON; these types are for consumers
//! that want to present them.

use serde::{Deserialize, Serialize};

/// Output of a simple analysis (`/data/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    /// ARIMA forecast plot as an HTML fragment
    pub arima_plot: Option<String>,
    pub sentiment: Option<f64>,
    pub posts: Option<Vec<RedditPost>>,
}

/// Output of a hybrid analysis (`/hybrid_data/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HybridData {
    /// Combined forecast plot as an HTML fragment
    pub hybrid_plot: Option<String>,
}

/// A Reddit post that contributed to the sentiment score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub title: String,
    pub url: String,
    pub score: i64,
    /// "Positive", "Negative" or "Neutral"
    pub sentiment: String,
    #[serde(default)]
    pub comments: Vec<RedditComment>,
}

/// A comment under a [`RedditPost`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditComment {
    pub body: String,
    pub author: String,
    pub score: i64,
    pub sentiment: String,
}

/// Error metrics produced by a backtest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub arima_mae: f64,
    pub arima_rmse: f64,
    pub lstm_mae: f64,
    pub lstm_rmse: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_data_with_posts() {
        let data: AnalysisData = serde_json::from_value(serde_json::json!({
            "arima_plot": "<div></div>",
            "sentiment": 0.31,
            "posts": [{
                "title": "AAPL earnings",
                "url": "https://reddit.com/r/stocks/1",
                "score": 42,
                "sentiment": "Positive",
                "comments": [{"body": "nice", "author": "[deleted]", "score": 1, "sentiment": "Neutral"}]
            }]
        }))
        .unwrap();
        let posts = data.posts.unwrap();
        assert_eq!(posts[0].score, 42);
        assert_eq!(posts[0].comments.len(), 1);
    }

    #[test]
    fn test_analysis_data_not_ready() {
        let data: AnalysisData = serde_json::from_value(serde_json::json!({
            "arima_plot": null, "sentiment": null, "posts": null
        }))
        .unwrap();
        assert_eq!(data, AnalysisData::default());
    }
}
