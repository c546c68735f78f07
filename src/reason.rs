use crate::metrics::conversion_rate;
use crate::{Focus, Metrics};

pub fn format_rate(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "no data".to_string(),
    }
}

pub fn format_count(value: Option<u64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "no data".to_string(),
    }
}

// Deterministic rendering of the decision: names the weak signals behind the
// chosen focus and prescribes the next move. Absent metrics print as
// "no data", never as zero.
pub fn compose_reason(focus: Focus, metrics: &Metrics) -> String {
    let ctr = format_rate(metrics.ctr);
    let retention_base = metrics
        .retention
        .or(metrics.avg_watch_pct)
        .or(metrics.completion_rate);
    let retention = format_rate(retention_base);

    match focus {
        Focus::Conversion => {
            let conv = format_rate(conversion_rate(metrics));
            format!(
                "Interest is validated (CTR about {}, clicks {}, reach {}) but conversion stays low ({}). \
                 Prioritize CONVERSION: show a real result or a short case, answer the frequent objections, \
                 and close with one clear next step that keeps the promise consistent up to the landing.",
                ctr,
                format_count(metrics.clicks),
                format_count(metrics.reach),
                conv
            )
        }
        Focus::Retention => {
            let interactions = if metrics.saves.is_none()
                && metrics.shares.is_none()
                && metrics.comments.is_none()
            {
                "no data".to_string()
            } else {
                (metrics.saves.unwrap_or(0)
                    + metrics.shares.unwrap_or(0)
                    + metrics.comments.unwrap_or(0))
                .to_string()
            };
            format!(
                "Watch time is weak (retention about {}) and interaction is low (saves plus shares plus comments is {}). \
                 Prioritize RETENTION: hook inside the first two seconds, one idea per piece, fast pacing and cuts; \
                 add a clear demonstration in {}.",
                retention, interactions, metrics.niche
            )
        }
        Focus::Discovery => format!(
            "Discovery is falling short (CTR about {}, reach {}, impressions {}) while retention holds up ({} when reported). \
             Prioritize DISCOVERY: a stronger thumbnail with an explicit promise, search-oriented titles and \
             comparative angles to lift the CTR.",
            ctr,
            format_count(metrics.reach),
            format_count(metrics.impressions),
            retention
        ),
    }
}
