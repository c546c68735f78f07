use serde::{Deserialize, Serialize};

use focus_reco::context::{ExampleItem, TrendKeyword};
use focus_reco::{Focus, FocusScores, Metrics, Recommendation};

#[derive(Debug, Deserialize)]
pub struct ApiRecommendRequest {
    pub niche: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub followers: Option<u64>,
    pub impressions: Option<u64>,
    pub reach: Option<u64>,
    pub clicks: Option<u64>,
    pub conversions: Option<u64>,
    pub likes: Option<u64>,
    pub shares: Option<u64>,
    pub saves: Option<u64>,
    pub comments: Option<u64>,
    pub followers_change: Option<i64>,
    pub ctr: Option<f64>,
    pub retention: Option<f64>,
    pub avg_watch_pct: Option<f64>,
    pub completion_rate: Option<f64>,
    pub freq: Option<f64>,
    pub top_k: Option<usize>,
    pub temperature: Option<f64>,
    pub request_id: Option<String>,
}

impl ApiRecommendRequest {
    pub fn to_metrics(&self) -> Result<Metrics, String> {
        let niche = self
            .niche
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if niche.is_empty() {
            return Err("niche is required".to_string());
        }

        Ok(Metrics {
            platform: self.platform.clone(),
            niche,
            format: self.format.clone(),
            followers: self.followers,
            impressions: self.impressions,
            reach: self.reach,
            clicks: self.clicks,
            conversions: self.conversions,
            likes: self.likes,
            shares: self.shares,
            saves: self.saves,
            comments: self.comments,
            followers_change: self.followers_change,
            ctr: self.ctr,
            retention: self.retention,
            avg_watch_pct: self.avg_watch_pct,
            completion_rate: self.completion_rate,
            freq: self.freq,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiRecommendResponse {
    pub request_id: String,
    pub focus: Focus,
    pub scores: FocusScores,
    pub recommendation: String,
    pub reason: String,
    pub ideas: Vec<String>,
    pub hashtags_for_ideas: Vec<Vec<String>>,
    pub metrics: Metrics,
    pub fully_valid: bool,
    pub examples: Vec<ExampleItem>,
    pub trends: Vec<TrendKeyword>,
    pub warnings: Vec<String>,
}

impl ApiRecommendResponse {
    pub fn from_output(output: Recommendation, warnings: Vec<String>, request_id: String) -> Self {
        Self {
            request_id,
            focus: output.focus,
            scores: output.scores,
            recommendation: output.recommendation,
            reason: output.reason,
            ideas: output.ideas,
            hashtags_for_ideas: output.hashtags_for_ideas,
            metrics: output.metrics,
            fully_valid: output.fully_valid,
            examples: output.examples,
            trends: output.trends,
            warnings,
        }
    }
}
