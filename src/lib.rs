pub mod config;
pub mod context;
pub mod generator;
pub mod hashtags;
pub mod ideas;
pub mod metrics;
pub mod reason;
pub mod repair;
pub mod scoring;
pub mod text;
pub mod validate;
pub mod vocab;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::context::{build_llm_context, ExampleItem, LlmContext, NicheContext, TrendKeyword};
use crate::generator::TextGenerator;
use crate::hashtags::HashtagAllocator;
use crate::repair::CritiqueRepairLoop;
use crate::vocab::AllowedVocabulary;

pub use crate::scoring::{FocusDecision, FocusScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Discovery,
    Retention,
    Conversion,
}

impl Focus {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "discovery" | "attract" => Some(Focus::Discovery),
            "retention" | "retain" => Some(Focus::Retention),
            "conversion" | "convert" | "sell" => Some(Focus::Conversion),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Discovery => "discovery",
            Focus::Retention => "retention",
            Focus::Conversion => "conversion",
        }
    }

    // Tie-break order: the more directly actionable objective wins.
    pub fn tie_priority(self) -> u8 {
        match self {
            Focus::Discovery => 0,
            Focus::Retention => 1,
            Focus::Conversion => 2,
        }
    }
}

// One request's engagement snapshot. Rates arrive as fractions or
// percentages and are folded into [0,1] by metrics::normalize before
// scoring; counters stay raw.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub platform: Option<String>,
    pub niche: String,
    pub format: Option<String>,
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
}

// Unvalidated candidate response from the text generator; mutated in place
// by the validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub ideas: Vec<String>,
    #[serde(default)]
    pub hashtags_for_ideas: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
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
}

// Heuristic-only path: decision, composed reason, and static content. No
// external call anywhere in here.
pub fn recommend(metrics: &Metrics, specialties: &[String], config: &EngineConfig) -> Recommendation {
    let normalized = metrics::normalize(metrics.clone(), &config.proxy);
    let decision = scoring::decide_focus(&normalized, config);

    let mut draft = Draft {
        recommendation: ideas::default_recommendation(decision.focus),
        reason: ideas::fallback_reason(decision.focus, &normalized),
        ideas: ideas::fallback_ideas(decision.focus, &normalized.niche),
        hashtags_for_ideas: Vec::new(),
    };
    finalize_draft(&mut draft, decision.focus, &normalized, specialties, &LlmContext::default(), config);

    Recommendation {
        focus: decision.focus,
        scores: decision.scores,
        recommendation: draft.recommendation,
        reason: draft.reason,
        ideas: draft.ideas,
        hashtags_for_ideas: draft.hashtags_for_ideas,
        metrics: normalized,
        fully_valid: true,
        examples: Vec::new(),
        trends: Vec::new(),
    }
}

// Full path: decision, context assembly, one generation, validation, at most
// one repair round, then defaults for anything still missing.
pub async fn recommend_with_generator(
    metrics: &Metrics,
    specialties: &[String],
    generator: &dyn TextGenerator,
    niche_context: &NicheContext,
    temperature: f64,
    config: &EngineConfig,
) -> Recommendation {
    let normalized = metrics::normalize(metrics.clone(), &config.proxy);
    let decision = scoring::decide_focus(&normalized, config);
    let context = build_llm_context(
        &normalized.niche,
        specialties,
        normalized.platform.as_deref(),
        10,
        niche_context,
    );

    let repair_loop = CritiqueRepairLoop::new(generator, &config.generator);
    let (mut draft, fully_valid) = repair_loop
        .run(
            decision.focus,
            &normalized,
            specialties,
            &context,
            temperature,
            &config.validator,
        )
        .await;
    finalize_draft(&mut draft, decision.focus, &normalized, specialties, &context, config);

    Recommendation {
        focus: decision.focus,
        scores: decision.scores,
        recommendation: draft.recommendation,
        reason: draft.reason,
        ideas: draft.ideas,
        hashtags_for_ideas: draft.hashtags_for_ideas,
        metrics: normalized,
        fully_valid,
        examples: context.examples,
        trends: context.trends,
    }
}

// Whatever happened upstream, the payload that leaves carries a non-empty
// recommendation, reason, idea list, and an aligned hashtag block.
fn finalize_draft(
    draft: &mut Draft,
    focus: Focus,
    metrics: &Metrics,
    specialties: &[String],
    context: &LlmContext,
    config: &EngineConfig,
) {
    if draft.recommendation.trim().is_empty() {
        draft.recommendation = ideas::default_recommendation(focus);
    }
    if draft.reason.trim().is_empty() {
        draft.reason = ideas::fallback_reason(focus, metrics);
    }
    if draft.ideas.is_empty() {
        draft.ideas = ideas::fallback_ideas(focus, &metrics.niche);
    }
    if draft.hashtags_for_ideas.len() != draft.ideas.len() {
        let vocab = AllowedVocabulary::build(
            &metrics.niche,
            specialties,
            &context.glossary,
            &context.expanded_specialties,
            &draft.ideas,
        );
        let allocator = HashtagAllocator::from_config(&config.validator);
        let block = allocator.allocate(&draft.ideas, &metrics.niche, specialties, &vocab);
        draft.hashtags_for_ideas = allocator.sanitize(&block, &metrics.niche, &vocab);
    }
}
