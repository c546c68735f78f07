use serde::Serialize;

use crate::config::EngineConfig;
use crate::scoring::{ConversionScorer, DiscoveryScorer, RetentionScorer};
use crate::{Focus, Metrics};

// Scores within one ulp-ish of each other are ties; the weighted indicator
// sums land on the same nominal value through different float paths.
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FocusScores {
    pub discovery: f64,
    pub retention: f64,
    pub conversion: f64,
}

impl FocusScores {
    pub fn get(&self, focus: Focus) -> f64 {
        match focus {
            Focus::Discovery => self.discovery,
            Focus::Retention => self.retention,
            Focus::Conversion => self.conversion,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusDecision {
    pub focus: Focus,
    pub scores: FocusScores,
}

pub fn decide_focus(metrics: &Metrics, config: &EngineConfig) -> FocusDecision {
    let scores = FocusScores {
        discovery: DiscoveryScorer::new(config.discovery.clone()).score(metrics),
        retention: RetentionScorer::new(config.retention.clone()).score(metrics),
        conversion: ConversionScorer::new(config.conversion.clone()).score(metrics),
    };

    // Argmax with ties broken toward the more actionable objective:
    // conversion > retention > discovery.
    let mut focus = Focus::Discovery;
    let mut best = scores.discovery;
    for candidate in [Focus::Retention, Focus::Conversion] {
        let value = scores.get(candidate);
        if value > best + SCORE_EPSILON
            || ((value - best).abs() <= SCORE_EPSILON
                && candidate.tie_priority() > focus.tie_priority())
        {
            focus = candidate;
            best = value;
        }
    }

    FocusDecision { focus, scores }
}
