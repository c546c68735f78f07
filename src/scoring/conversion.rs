use crate::config::ConversionConfig;
use crate::metrics::conversion_rate;
use crate::scoring::indicator;
use crate::Metrics;

#[derive(Debug, Clone)]
pub struct ConversionScorer {
    config: ConversionConfig,
}

impl ConversionScorer {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    // Conversion only makes sense once there is traffic to convert: validated
    // interest with a weak conversion rate behind it.
    pub fn score(&self, metrics: &Metrics) -> f64 {
        let enough_traffic = metrics
            .ctr
            .map(|value| value >= self.config.traffic_ctr_threshold)
            .unwrap_or(false)
            || metrics
                .clicks
                .map(|value| value > self.config.traffic_clicks_floor)
                .unwrap_or(false);

        let low_conversion = conversion_rate(metrics)
            .map(|value| value < self.config.low_conversion_rate)
            .unwrap_or(false)
            || (metrics.conversions == Some(0)
                && metrics.clicks.unwrap_or(0) > self.config.zero_conversion_clicks);

        let reach_ok = metrics
            .reach
            .map(|value| (value as f64) > self.config.reach_floor)
            .unwrap_or(false)
            || metrics
                .impressions
                .map(|value| (value as f64) > self.config.impressions_floor)
                .unwrap_or(false);

        self.config.traffic_weight * indicator(enough_traffic)
            + self.config.low_conversion_weight * indicator(low_conversion)
            + self.config.reach_weight * indicator(reach_ok)
    }
}
