use crate::config::RetentionProxyConfig;
use crate::Metrics;

// Rates may arrive as fractions (0.45) or percentages (45). Values above 1
// are treated as percentages; anything else is already a fraction, which
// keeps the fold idempotent.
pub fn fold_percent(value: f64) -> f64 {
    if value > 1.0 {
        value / 100.0
    } else {
        value
    }
}

fn ratio(numerator: Option<u64>, denominator: Option<u64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0 => Some(n as f64 / d as f64),
        _ => None,
    }
}

pub fn normalize(mut metrics: Metrics, proxy: &RetentionProxyConfig) -> Metrics {
    if let Some(value) = metrics.ctr {
        metrics.ctr = Some(fold_percent(value));
    }
    if let Some(value) = metrics.retention {
        metrics.retention = Some(fold_percent(value));
    }
    if let Some(value) = metrics.avg_watch_pct {
        metrics.avg_watch_pct = Some(fold_percent(value));
    }
    if let Some(value) = metrics.completion_rate {
        metrics.completion_rate = Some(fold_percent(value));
    }

    if metrics.ctr.is_none() {
        metrics.ctr = ratio(metrics.clicks, metrics.impressions);
    }

    if metrics.retention.is_none() {
        metrics.retention = if let Some(value) = metrics.avg_watch_pct {
            Some(value)
        } else if let Some(value) = metrics.completion_rate {
            Some(value)
        } else {
            engagement_proxy(&metrics, proxy)
        };
    }

    metrics
}

// Absence stays absence: without a usable denominator no retention value is
// fabricated.
fn engagement_proxy(metrics: &Metrics, proxy: &RetentionProxyConfig) -> Option<f64> {
    let denominator = metrics
        .impressions
        .filter(|value| *value > 0)
        .or_else(|| metrics.followers.filter(|value| *value > 0))?;

    let numerator = proxy.like_weight * metrics.likes.unwrap_or(0) as f64
        + proxy.comment_weight * metrics.comments.unwrap_or(0) as f64
        + proxy.share_weight * metrics.shares.unwrap_or(0) as f64
        + proxy.save_weight * metrics.saves.unwrap_or(0) as f64;

    let rate = numerator / denominator as f64;
    Some((rate * proxy.boost).clamp(proxy.floor, proxy.ceiling))
}

pub fn conversion_rate(metrics: &Metrics) -> Option<f64> {
    ratio(metrics.conversions, metrics.clicks)
}
