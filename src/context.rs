use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::text;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendKeyword {
    pub keyword: String,
    pub score: f64,
}

// Whatever the graph store answered for one niche/region. The engine never
// owns the connection behind this; callers hand in an implementation.
#[derive(Debug, Clone, Default)]
pub struct NicheContext {
    pub examples: Vec<ExampleItem>,
    pub trends: Vec<TrendKeyword>,
}

#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn fetch(
        &self,
        niche: &str,
        region: Option<&str>,
        top_k: usize,
    ) -> Result<NicheContext, String>;
}

// Fixed context, mostly for tests and for running without a graph store.
#[derive(Debug, Clone, Default)]
pub struct StaticContext(pub NicheContext);

#[async_trait]
impl ContextProvider for StaticContext {
    async fn fetch(
        &self,
        _niche: &str,
        _region: Option<&str>,
        _top_k: usize,
    ) -> Result<NicheContext, String> {
        Ok(self.0.clone())
    }
}

// Context assembled for one generation request.
#[derive(Debug, Clone, Default)]
pub struct LlmContext {
    pub glossary: Vec<String>,
    pub expanded_specialties: Vec<String>,
    pub example_titles: Vec<String>,
    pub style_hints: Vec<String>,
    pub banned_analogies: Vec<String>,
    pub trends: Vec<TrendKeyword>,
    pub examples: Vec<ExampleItem>,
}

pub const BANNED_ANALOGIES: &[&str] = &[
    "tabs vs spaces",
    "tip of the iceberg",
    "trojan horse",
    "roller coaster",
    "cup final",
];

const TITLE_STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "your", "from", "that", "this", "how", "why", "what", "into",
    "are", "you", "not", "los", "las", "del", "para", "por", "con", "una", "como", "que", "sus",
    "vs", "guide", "guia", "step", "paso", "checklist", "errors", "errores", "tutorial",
];

pub fn extract_glossary(titles: &[String], limit: usize) -> Vec<String> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for title in titles {
        for token in text::tokenize(title) {
            if TITLE_STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            *freq.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}

// Naive lexical expansion: singular stems and hyphen parts. Anything deeper
// belongs to the external graph layer.
pub fn expand_specialties(specialties: &[String]) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let mut push_unique = |value: String| {
        if !value.is_empty() && !expanded.contains(&value) {
            expanded.push(value);
        }
    };

    for specialty in specialties {
        let normalized = text::normalize_token(specialty);
        if normalized.is_empty() {
            continue;
        }
        push_unique(normalized.clone());
        if let Some(stem) = normalized.strip_suffix('s') {
            push_unique(stem.to_string());
        }
        for part in specialty.split('-') {
            push_unique(text::normalize_token(part));
        }
    }

    expanded.sort();
    expanded
}

pub fn style_hints(platform: Option<&str>) -> Vec<String> {
    let hints: &[&str] = match platform.map(|p| p.to_lowercase()).as_deref() {
        Some("youtube") => &[
            "Skip long intros; show the result up front",
            "Clear chapters; soft call-to-action between minute 1 and 2",
        ],
        Some("shorts") => &[
            "Hook within 1-2 seconds with a visual result",
            "Large clean text; fast cuts",
        ],
        Some("tiktok") => &[
            "9:16 with automatic subtitles",
            "A cut every 2-3 seconds; one idea per video",
        ],
        Some("instagram") | Some("reels") => &[
            "Open with the benefit in the first sentence",
            "A clear visual of the result; short text",
        ],
        _ => &[],
    };
    hints.iter().map(|hint| hint.to_string()).collect()
}

pub fn build_llm_context(
    niche: &str,
    specialties: &[String],
    platform: Option<&str>,
    top_k: usize,
    niche_context: &NicheContext,
) -> LlmContext {
    let example_titles: Vec<String> = niche_context
        .examples
        .iter()
        .map(|example| example.title.trim().to_string())
        .filter(|title| !title.is_empty())
        .collect();

    let mut glossary = extract_glossary(&example_titles, 20);
    if glossary.is_empty() {
        glossary = text::tokenize(niche);
    }

    LlmContext {
        glossary,
        expanded_specialties: expand_specialties(specialties),
        example_titles: example_titles.into_iter().take(top_k).collect(),
        style_hints: style_hints(platform),
        banned_analogies: BANNED_ANALOGIES.iter().map(|s| s.to_string()).collect(),
        trends: niche_context.trends.clone(),
        examples: niche_context.examples.clone(),
    }
}
