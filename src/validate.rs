use std::collections::HashSet;

use crate::config::ValidatorConfig;
use crate::context::LlmContext;
use crate::hashtags::HashtagAllocator;
use crate::text;
use crate::vocab::AllowedVocabulary;
use crate::Draft;

// Filler the generator falls back to when it ignores the instructions.
pub const BANNED_PHRASES: &[&str] = &[
    "idea 1",
    "idea1",
    "idea 2",
    "idea2",
    "placeholder",
    "lorem",
    "generic content",
    "general strategies",
    "insert topic",
];

pub fn is_generic_text(value: &str) -> bool {
    let lowered = value.to_lowercase();
    BANNED_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

fn bullet_count(reason: &str) -> usize {
    reason
        .lines()
        .filter(|line| line.trim_start().starts_with("- "))
        .count()
}

// Validate and repair in place. Violations are recorded, never raised: the
// draft that comes back is always usable, the flag says whether it is fully
// compliant.
pub fn validate_and_fix(
    draft: &mut Draft,
    niche: &str,
    specialties: &[String],
    context: &LlmContext,
    config: &ValidatorConfig,
) -> bool {
    let mut ok = true;

    draft.recommendation = text::sanitize_line(&draft.recommendation);
    draft.reason = text::sanitize_block(&draft.reason);
    if draft.recommendation.is_empty() || is_generic_text(&draft.recommendation) {
        ok = false;
    }
    if draft.reason.is_empty() || is_generic_text(&draft.reason) {
        ok = false;
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut ideas: Vec<String> = Vec::new();
    for idea in &draft.ideas {
        let cleaned = text::sanitize_line(idea);
        if cleaned.is_empty() {
            continue;
        }
        if seen.insert(cleaned.to_lowercase()) {
            ideas.push(cleaned);
        }
    }
    if ideas.len() < config.min_ideas {
        ok = false;
    }
    if ideas.iter().any(|idea| is_generic_text(idea)) {
        ok = false;
    }
    draft.ideas = ideas;

    let vocab = AllowedVocabulary::build(
        niche,
        specialties,
        &context.glossary,
        &context.expanded_specialties,
        &draft.ideas,
    );
    let allocator = HashtagAllocator::from_config(config);
    if draft.hashtags_for_ideas.len() != draft.ideas.len() {
        draft.hashtags_for_ideas = allocator.allocate(&draft.ideas, niche, specialties, &vocab);
    }
    // Even a well-shaped block goes through sanitation: global dedup and the
    // niche-tag cap apply regardless of origin.
    draft.hashtags_for_ideas = allocator.sanitize(&draft.hashtags_for_ideas, niche, &vocab);

    if !specialties.is_empty() {
        let recommendation = draft.recommendation.to_lowercase();
        if !specialties
            .iter()
            .any(|specialty| recommendation.contains(&specialty.to_lowercase()))
        {
            ok = false;
        }
    }

    if bullet_count(&draft.reason) != config.reason_bullets {
        ok = false;
    }

    ok
}
