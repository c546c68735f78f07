use crate::config::{GeneratorConfig, ValidatorConfig};
use crate::context::LlmContext;
use crate::generator::{parse_draft, ChatMessage, TextGenerator};
use crate::validate;
use crate::{Draft, Focus, Metrics};

const SYSTEM_PROMPT: &str = "\
You are a warm, plain-spoken content strategist. You always answer with valid JSON and nothing else, no markdown.
No jargon, no cliches, no placeholders.

OUTPUT RULES:
- \"recommendation\": one sentence, no timestamps, naming at least ONE of the specialties (when any exist).
- \"reason\": one paragraph in this exact order: the signals in plain words (few people come in, they leave early, the next step is hard), the objective (attract / retain / sell), one short ORIGINAL analogy (never one from the banned list), then exactly 4 bullet lines starting with \"- \", imperative and concrete, adapted to platform and specialties.
- \"ideas\": 10-12 titles, 30-70 characters each, about half direct and half creative, mixing glossary terms and specialties without repeating templates.
- \"hashtags_for_ideas\": 2-3 concise hashtags per idea, lowercase, no accents, no generic tags, no repeats anywhere in the block, at most one niche hashtag overall.

FORBIDDEN:
- Metric percentages or numbers inside \"reason\".
- Exact durations or time promises.
- Analogies from the banned list in the context.
- Placeholder text of any kind.";

const CRITIQUE_PROMPT: &str = "\
Repair the JSON where it breaks the rules:
- \"recommendation\" must name at least ONE of the specialties (when any exist).
- \"reason\": no metric numbers; an original analogy (not a banned one); exactly 4 bullet lines starting with \"- \", imperative and concrete.
- \"ideas\": 10-12 entries, mixing glossary terms and specialties, no cloned templates, coherent with the current focus.
- \"hashtags_for_ideas\": 2-3 per idea; no generic tags, no accents, no repeats anywhere in the block; at most one niche hashtag overall.
Answer ONLY with the corrected JSON.";

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

pub fn build_messages(
    focus: Focus,
    metrics: &Metrics,
    specialties: &[String],
    context: &LlmContext,
) -> Vec<ChatMessage> {
    let platform = metrics.platform.clone().unwrap_or_else(|| "multi-platform".to_string());
    let metrics_json = serde_json::to_string(metrics).unwrap_or_else(|_| "{}".to_string());
    let titles_json =
        serde_json::to_string(&context.example_titles).unwrap_or_else(|_| "[]".to_string());

    let user = format!(
        "Business context:\n\
         - Niche: {niche}\n\
         - Specialties: {specialties}\n\
         - Platform: {platform}\n\
         - Focus: {focus}\n\
         - Niche glossary: {glossary}\n\
         - Expanded specialties: {expanded}\n\
         - Platform style hints: {style}\n\
         - Banned analogies: {banned}\n\
         - Raw metrics: {metrics}\n\
         - Recent example titles: {titles}\n\
         \n\
         Your task:\n\
         1) \"recommendation\": one sentence that names at least one specialty (when any exist).\n\
         2) \"reason\": one paragraph in the required order with exactly 4 bullet lines starting with \"- \".\n\
         3) \"ideas\": 10-12 varied, human titles adapted to the current focus.\n\
         4) \"hashtags_for_ideas\": 2-3 per idea, within the rules above.\n\
         \n\
         OUTPUT:\n\
         {{\"recommendation\": \"...\", \"reason\": \"...\", \"ideas\": [\"...\"], \"hashtags_for_ideas\": [[\"#...\", \"#...\"]]}}",
        niche = metrics.niche,
        specialties = join_or_none(specialties),
        platform = platform,
        focus = focus.label(),
        glossary = join_or_none(&context.glossary),
        expanded = join_or_none(&context.expanded_specialties),
        style = if context.style_hints.is_empty() {
            "none".to_string()
        } else {
            context.style_hints.join("; ")
        },
        banned = join_or_none(&context.banned_analogies),
        metrics = metrics_json,
        titles = titles_json,
    );

    vec![
        ChatMessage::System(SYSTEM_PROMPT.to_string()),
        ChatMessage::User(user),
    ]
}

fn critique_messages(draft: &Draft, metrics: &Metrics, specialties: &[String]) -> Vec<ChatMessage> {
    let draft_json = serde_json::to_string(draft).unwrap_or_else(|_| "{}".to_string());
    let platform = metrics.platform.clone().unwrap_or_else(|| "multi".to_string());
    vec![
        ChatMessage::System(SYSTEM_PROMPT.to_string()),
        ChatMessage::User(CRITIQUE_PROMPT.to_string()),
        ChatMessage::Assistant(draft_json),
        ChatMessage::User(format!(
            "Niche: {} | Platform: {} | Specialties: {}",
            metrics.niche,
            platform,
            join_or_none(specialties)
        )),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairState {
    DraftPending,
    Repaired,
}

pub struct CritiqueRepairLoop<'a> {
    generator: &'a dyn TextGenerator,
    config: &'a GeneratorConfig,
}

impl<'a> CritiqueRepairLoop<'a> {
    pub fn new(generator: &'a dyn TextGenerator, config: &'a GeneratorConfig) -> Self {
        Self { generator, config }
    }

    // One generation, then at most one critique round-trip. A draft that is
    // still invalid after the round is kept as-is (already partially fixed by
    // the validator); bounding the external calls takes priority over full
    // compliance.
    pub async fn run(
        &self,
        focus: Focus,
        metrics: &Metrics,
        specialties: &[String],
        context: &LlmContext,
        temperature: f64,
        validator: &ValidatorConfig,
    ) -> (Draft, bool) {
        let messages = build_messages(focus, metrics, specialties, context);
        let raw = match self.generator.generate(&messages, temperature).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "generation failed; falling back to static draft");
                return (Draft::default(), false);
            }
        };

        let mut draft = match parse_draft(&raw) {
            Ok(draft) => draft,
            Err(err) => {
                tracing::warn!(error = %err, "draft not parseable; falling back to static draft");
                return (Draft::default(), false);
            }
        };

        let mut valid =
            validate::validate_and_fix(&mut draft, &metrics.niche, specialties, context, validator);

        // Two states only: once Repaired is reached the loop is done, however
        // the round went.
        let mut state = RepairState::DraftPending;
        while !valid && state == RepairState::DraftPending {
            state = RepairState::Repaired;
            tracing::info!("draft invalid; requesting one repair round");
            let follow_up = critique_messages(&draft, metrics, specialties);
            match self
                .generator
                .generate(&follow_up, self.config.repair_temperature)
                .await
            {
                Ok(text) => {
                    if let Ok(mut repaired) = parse_draft(&text) {
                        let repaired_valid = validate::validate_and_fix(
                            &mut repaired,
                            &metrics.niche,
                            specialties,
                            context,
                            validator,
                        );
                        if repaired_valid {
                            draft = repaired;
                            valid = true;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "repair round failed; keeping original draft");
                }
            }
        }

        (draft, valid)
    }
}
