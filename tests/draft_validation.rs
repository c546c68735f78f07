use focus_reco::config::ValidatorConfig;
use focus_reco::context::LlmContext;
use focus_reco::hashtags::{niche_tag, HashtagAllocator};
use focus_reco::validate::validate_and_fix;
use focus_reco::vocab::AllowedVocabulary;
use focus_reco::Draft;

fn ten_ideas() -> Vec<String> {
    vec![
        "Docker basics in 3 simple steps".to_string(),
        "Kubernetes mistakes that cost deploys".to_string(),
        "REST vs GraphQL: when to pick each".to_string(),
        "Linux commands worth memorizing".to_string(),
        "Python scripts that save an hour".to_string(),
        "SQL or NoSQL: a framework to decide".to_string(),
        "Cloud costs: 3 silent leaks".to_string(),
        "Backend logging done right".to_string(),
        "Microservices before you need them".to_string(),
        "Securing an API in one afternoon".to_string(),
    ]
}

fn reason_with_bullets(count: usize) -> String {
    let mut reason = String::from(
        "Few people click through and the next step is hard. The goal is to sell. \
         It is like a shop window that draws nobody inside.",
    );
    for index in 0..count {
        reason.push_str(&format!("\n- Concrete step number {}.", index + 1));
    }
    reason
}

fn valid_draft() -> Draft {
    Draft {
        recommendation: "Publish one docker comparison this week.".to_string(),
        reason: reason_with_bullets(4),
        ideas: ten_ideas(),
        hashtags_for_ideas: Vec::new(),
    }
}

fn run(draft: &mut Draft, niche: &str, specialties: &[String]) -> bool {
    validate_and_fix(
        draft,
        niche,
        specialties,
        &LlmContext::default(),
        &ValidatorConfig::default(),
    )
}

#[test]
fn exactly_four_bullets_required() {
    let mut draft = valid_draft();
    assert!(run(&mut draft, "tech", &[]));

    for count in [3, 5] {
        let mut draft = valid_draft();
        draft.reason = reason_with_bullets(count);
        assert!(!run(&mut draft, "tech", &[]));
    }
}

#[test]
fn eight_ideas_fall_below_the_floor() {
    let mut draft = valid_draft();
    draft.ideas.truncate(8);
    assert!(!run(&mut draft, "tech", &[]));
}

#[test]
fn ideas_deduplicated_case_insensitively() {
    let mut draft = valid_draft();
    draft.ideas.push("DOCKER BASICS IN 3 SIMPLE STEPS".to_string());
    draft.ideas.push("  Docker basics in 3 simple steps  ".to_string());

    assert!(run(&mut draft, "tech", &[]));
    assert_eq!(draft.ideas.len(), 10);
}

#[test]
fn banned_generic_phrases_invalidate() {
    let mut draft = valid_draft();
    draft.recommendation = "Here is a placeholder recommendation.".to_string();
    assert!(!run(&mut draft, "tech", &[]));

    let mut draft = valid_draft();
    draft.ideas[3] = "Idea 2".to_string();
    assert!(!run(&mut draft, "tech", &[]));
}

#[test]
fn recommendation_must_mention_a_specialty() {
    let specialties = vec!["kubernetes".to_string()];

    let mut draft = valid_draft();
    assert!(!run(&mut draft, "tech", &specialties));

    let mut draft = valid_draft();
    draft.recommendation = "Ship a kubernetes postmortem this week.".to_string();
    assert!(run(&mut draft, "tech", &specialties));
}

#[test]
fn disallowed_characters_are_stripped() {
    let mut draft = valid_draft();
    draft.recommendation = "Publish one docker comparison this week. \u{1F525}\u{1F680}".to_string();

    assert!(run(&mut draft, "tech", &[]));
    assert_eq!(
        draft.recommendation,
        "Publish one docker comparison this week."
    );
}

#[test]
fn hashtag_block_realigned_to_ideas() {
    let mut draft = valid_draft();
    draft.hashtags_for_ideas = vec![vec!["#docker".to_string()]];

    run(&mut draft, "tech", &[]);
    assert_eq!(draft.hashtags_for_ideas.len(), draft.ideas.len());
}

#[test]
fn well_formed_block_still_sanitized_globally() {
    let mut draft = valid_draft();
    draft.hashtags_for_ideas = draft
        .ideas
        .iter()
        .map(|_| vec!["#docker".to_string(), "#tips".to_string(), "#tech".to_string()])
        .collect();

    run(&mut draft, "tech", &[]);

    let flat: Vec<&String> = draft.hashtags_for_ideas.iter().flatten().collect();
    // One #docker survives, #tips is generic, #tech is the niche tag (capped
    // at one use).
    assert_eq!(flat.iter().filter(|tag| tag.as_str() == "#docker").count(), 1);
    assert_eq!(flat.iter().filter(|tag| tag.as_str() == "#tips").count(), 0);
    assert_eq!(flat.iter().filter(|tag| tag.as_str() == "#tech").count(), 1);
}

#[test]
fn allocator_respects_caps_and_global_dedup() {
    let ideas = ten_ideas();
    let specialties = vec!["docker".to_string(), "kubernetes".to_string()];
    let vocab = AllowedVocabulary::build("tech", &specialties, &[], &[], &ideas);
    let allocator = HashtagAllocator::from_config(&ValidatorConfig::default());

    let block = allocator.allocate(&ideas, "tech", &specialties, &vocab);
    assert_eq!(block.len(), ideas.len());

    let mut seen = std::collections::HashSet::new();
    for row in &block {
        assert!(row.len() <= 3);
        for tag in row {
            assert!(tag.starts_with('#'));
            assert!(seen.insert(tag.clone()), "duplicate hashtag: {}", tag);
        }
    }

    let niche = niche_tag("tech").unwrap();
    let niche_uses = block
        .iter()
        .flatten()
        .filter(|tag| tag.as_str() == niche)
        .count();
    assert!(niche_uses <= 1);
}

#[test]
fn vocabulary_gates_hashtags_loosely() {
    let ideas = vec!["Docker compose deploys without drama".to_string()];
    let vocab = AllowedVocabulary::build("tech", &[], &[], &[], &ideas);
    let allocator = HashtagAllocator::new(3, 4);

    let block = allocator.sanitize(
        &[vec![
            "#dockercompose".to_string(),
            "#blockchain".to_string(),
        ]],
        "tech",
        &vocab,
    );

    // "docker" is a vocabulary entry and a substring of the first tag; the
    // second matches nothing in context.
    assert_eq!(block[0], vec!["#dockercompose".to_string()]);
}

#[test]
fn junk_tokens_never_enter_the_vocabulary() {
    let vocab = AllowedVocabulary::build(
        "tech",
        &[],
        &["checklist".to_string(), "tips".to_string(), "devops".to_string()],
        &[],
        &[],
    );

    assert!(vocab.contains("devops"));
    assert!(!vocab.contains("checklist"));
    assert!(!vocab.contains("tips"));
}

#[test]
fn niche_tag_folds_and_joins() {
    assert_eq!(
        niche_tag("Fisioterapia Deportiva").as_deref(),
        Some("#fisioterapiadeportiva")
    );
    assert_eq!(niche_tag("  "), None);
}
