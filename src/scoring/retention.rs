use crate::config::RetentionConfig;
use crate::scoring::indicator;
use crate::Metrics;

#[derive(Debug, Clone)]
pub struct RetentionScorer {
    config: RetentionConfig,
}

impl RetentionScorer {
    pub fn new(config: RetentionConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, metrics: &Metrics) -> f64 {
        let weak_watch = metrics
            .retention
            .map(|value| value < self.config.weak_retention_threshold)
            .unwrap_or(false)
            || metrics
                .avg_watch_pct
                .map(|value| value < self.config.weak_watch_threshold)
                .unwrap_or(false)
            || metrics
                .completion_rate
                .map(|value| value < self.config.weak_completion_threshold)
                .unwrap_or(false);

        let interactions = metrics.saves.unwrap_or(0)
            + metrics.shares.unwrap_or(0)
            + metrics.comments.unwrap_or(0);
        let low_engagement = interactions < self.config.low_engagement_floor;

        let low_freq = metrics
            .freq
            .map(|value| value < self.config.low_freq_threshold)
            .unwrap_or(false);

        self.config.weak_watch_weight * indicator(weak_watch)
            + self.config.low_engagement_weight * indicator(low_engagement)
            + self.config.low_freq_weight * indicator(low_freq)
    }
}
