use crate::config::DiscoveryConfig;
use crate::scoring::indicator;
use crate::Metrics;

#[derive(Debug, Clone)]
pub struct DiscoveryScorer {
    config: DiscoveryConfig,
}

impl DiscoveryScorer {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    // Discovery wins when the audience is not finding the content while the
    // content itself holds attention: low CTR, low reach, acceptable retention.
    pub fn score(&self, metrics: &Metrics) -> f64 {
        let low_ctr = metrics
            .ctr
            .map(|value| value < self.config.low_ctr_threshold)
            .unwrap_or(false);

        // A large account should clear a proportionally larger reach bar.
        let reach_threshold = match metrics.followers {
            Some(followers) => {
                (followers as f64 * self.config.reach_follower_share).max(self.config.low_reach_threshold)
            }
            None => self.config.low_reach_threshold,
        };
        let low_reach = metrics
            .reach
            .map(|value| (value as f64) < reach_threshold)
            .unwrap_or(false)
            || metrics
                .impressions
                .map(|value| (value as f64) < self.config.low_impressions_threshold)
                .unwrap_or(false);

        let retention_ok = metrics
            .retention
            .map(|value| value >= self.config.retention_ok_threshold)
            .unwrap_or(false);

        self.config.low_ctr_weight * indicator(low_ctr)
            + self.config.low_reach_weight * indicator(low_reach)
            + self.config.retention_ok_weight * indicator(retention_ok)
    }
}
