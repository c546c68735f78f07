pub mod conversion;
pub mod decision;
pub mod discovery;
pub mod retention;

pub use conversion::ConversionScorer;
pub use decision::{decide_focus, FocusDecision, FocusScores};
pub use discovery::DiscoveryScorer;
pub use retention::RetentionScorer;

pub(crate) fn indicator(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}
