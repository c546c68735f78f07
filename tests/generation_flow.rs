use async_trait::async_trait;
use std::sync::Mutex;

use focus_reco::config::EngineConfig;
use focus_reco::context::NicheContext;
use focus_reco::generator::{extract_json, parse_draft, ChatMessage, TextGenerator};
use focus_reco::{recommend, recommend_with_generator, Metrics};

struct ScriptedGenerator {
    responses: Mutex<Vec<String>>,
    calls: Mutex<usize>,
}

impl ScriptedGenerator {
    fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(0),
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _messages: &[ChatMessage], _temperature: f64) -> Result<String, String> {
        *self.calls.lock().unwrap() += 1;
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err("no scripted response left".to_string())
        } else {
            Ok(responses.remove(0))
        }
    }
}

struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _messages: &[ChatMessage], _temperature: f64) -> Result<String, String> {
        Err("generator unreachable".to_string())
    }
}

fn draft_json(bullets: usize, idea_count: usize) -> String {
    let mut reason = String::from(
        "People drop off early and the next step never lands. The goal is to retain. \
         It is like a song that loses the chorus halfway.",
    );
    for index in 0..bullets {
        reason.push_str(&format!("\n- Concrete step number {}.", index + 1));
    }
    let ideas: Vec<String> = (0..idea_count)
        .map(|index| format!("Boxing drill number {} for sharper defense", index + 1))
        .collect();
    serde_json::json!({
        "recommendation": "Train your jab with intent this week.",
        "reason": reason,
        "ideas": ideas,
    })
    .to_string()
}

fn boxing_metrics() -> Metrics {
    Metrics {
        niche: "boxing".to_string(),
        impressions: Some(1500),
        retention: Some(0.3),
        ..Metrics::default()
    }
}

#[tokio::test]
async fn valid_first_draft_skips_repair() {
    let config = EngineConfig::default();
    let generator = ScriptedGenerator::new(vec![draft_json(4, 10)]);

    let output = recommend_with_generator(
        &boxing_metrics(),
        &[],
        &generator,
        &NicheContext::default(),
        0.7,
        &config,
    )
    .await;

    assert!(output.fully_valid);
    assert_eq!(generator.call_count(), 1);
    assert_eq!(output.ideas.len(), 10);
    assert_eq!(output.hashtags_for_ideas.len(), output.ideas.len());
}

#[tokio::test]
async fn invalid_draft_gets_one_repair_round() {
    let config = EngineConfig::default();
    let generator = ScriptedGenerator::new(vec![draft_json(3, 10), draft_json(4, 10)]);

    let output = recommend_with_generator(
        &boxing_metrics(),
        &[],
        &generator,
        &NicheContext::default(),
        0.7,
        &config,
    )
    .await;

    assert!(output.fully_valid);
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn unrepairable_draft_kept_as_degraded_outcome() {
    let config = EngineConfig::default();
    let generator = ScriptedGenerator::new(vec![draft_json(3, 10), draft_json(3, 10)]);

    let output = recommend_with_generator(
        &boxing_metrics(),
        &[],
        &generator,
        &NicheContext::default(),
        0.7,
        &config,
    )
    .await;

    // The loop never runs a second repair; the partially fixed draft ships.
    assert!(!output.fully_valid);
    assert_eq!(generator.call_count(), 2);
    assert!(!output.recommendation.is_empty());
    assert_eq!(output.ideas.len(), 10);
    assert_eq!(output.hashtags_for_ideas.len(), output.ideas.len());
}

#[tokio::test]
async fn generator_failure_falls_back_to_static_defaults() {
    let config = EngineConfig::default();

    let output = recommend_with_generator(
        &boxing_metrics(),
        &[],
        &FailingGenerator,
        &NicheContext::default(),
        0.7,
        &config,
    )
    .await;

    assert!(!output.fully_valid);
    assert!(!output.recommendation.is_empty());
    assert_eq!(output.ideas.len(), 10);
    assert_eq!(output.hashtags_for_ideas.len(), output.ideas.len());

    let bullets = output
        .reason
        .lines()
        .filter(|line| line.trim_start().starts_with("- "))
        .count();
    assert_eq!(bullets, 4);
}

#[tokio::test]
async fn unparseable_response_falls_back_to_static_defaults() {
    let config = EngineConfig::default();
    let generator =
        ScriptedGenerator::new(vec!["I could not produce JSON this time, sorry.".to_string()]);

    let output = recommend_with_generator(
        &boxing_metrics(),
        &[],
        &generator,
        &NicheContext::default(),
        0.7,
        &config,
    )
    .await;

    assert!(!output.fully_valid);
    assert_eq!(generator.call_count(), 1);
    assert_eq!(output.ideas.len(), 10);
}

#[test]
fn json_extracted_from_surrounding_prose() {
    let wrapped = format!(
        "Sure, here is the draft you asked for:\n```json\n{}\n```\nHope it helps!",
        draft_json(4, 10)
    );

    let draft = parse_draft(&wrapped).unwrap();
    assert_eq!(draft.ideas.len(), 10);
    assert_eq!(draft.recommendation, "Train your jab with intent this week.");

    assert!(extract_json("no structured payload here").is_none());
}

#[test]
fn malformed_hashtag_rows_discard_the_block() {
    let raw = r##"{"recommendation": "r", "reason": "x", "ideas": ["one"], "hashtags_for_ideas": ["#flat", ["#nested"]]}"##;
    let draft = parse_draft(raw).unwrap();
    assert!(draft.hashtags_for_ideas.is_empty());
}

#[test]
fn heuristic_path_always_returns_complete_payload() {
    let config = EngineConfig::default();
    let output = recommend(&boxing_metrics(), &[], &config);

    assert!(!output.recommendation.is_empty());
    assert!(!output.reason.is_empty());
    assert_eq!(output.ideas.len(), 10);
    assert_eq!(output.hashtags_for_ideas.len(), output.ideas.len());
}
