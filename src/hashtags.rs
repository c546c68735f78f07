use std::collections::HashSet;

use crate::config::ValidatorConfig;
use crate::text;
use crate::vocab::AllowedVocabulary;

pub const GENERIC_TAGS: &[&str] = &[
    "#tips",
    "#checklist",
    "#tutorial",
    "#guide",
    "#content",
    "#video",
    "#viral",
];

pub fn niche_tag(niche: &str) -> Option<String> {
    if niche.trim().is_empty() {
        return None;
    }
    let tag = text::normalize_hashtag(&niche.replace(' ', ""));
    if tag.len() > 1 {
        Some(tag)
    } else {
        None
    }
}

fn is_generic(tag: &str) -> bool {
    GENERIC_TAGS.contains(&tag)
}

#[derive(Debug, Clone)]
pub struct HashtagAllocator {
    max_per_idea: usize,
    min_tag_len: usize,
}

impl HashtagAllocator {
    pub fn new(max_per_idea: usize, min_tag_len: usize) -> Self {
        Self {
            max_per_idea,
            min_tag_len,
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(config.max_hashtags_per_idea, config.min_hashtag_len)
    }

    fn accepts(&self, tag: &str, vocab: &AllowedVocabulary) -> bool {
        tag.len() >= self.min_tag_len
            && !is_generic(tag)
            && vocab.allows(tag.trim_start_matches('#'))
    }

    // Candidate order per idea: specialty tags first, then a token lifted from
    // the idea title, then the niche tag while it is still unused. Stops at
    // the cap; may yield fewer, never more.
    pub fn allocate(
        &self,
        ideas: &[String],
        niche: &str,
        specialties: &[String],
        vocab: &AllowedVocabulary,
    ) -> Vec<Vec<String>> {
        let mut used: HashSet<String> = HashSet::new();
        let base_niche_tag = niche_tag(niche);
        let specialty_tags: Vec<String> = specialties
            .iter()
            .filter_map(|specialty| text::hashtag_from_token(&specialty.replace(' ', "")))
            .take(3)
            .collect();

        let mut out = Vec::with_capacity(ideas.len());
        for title in ideas {
            let mut tags: Vec<String> = Vec::new();

            for tag in &specialty_tags {
                if tags.len() >= self.max_per_idea {
                    break;
                }
                if !used.contains(tag) && self.accepts(tag, vocab) {
                    tags.push(tag.clone());
                    used.insert(tag.clone());
                }
            }

            if tags.len() < self.max_per_idea {
                if let Some(tag) = title_tag(title) {
                    if !used.contains(&tag) && self.accepts(&tag, vocab) {
                        used.insert(tag.clone());
                        tags.push(tag);
                    }
                }
            }

            if tags.len() < self.max_per_idea {
                if let Some(tag) = base_niche_tag.as_ref() {
                    if !used.contains(tag) && self.accepts(tag, vocab) {
                        tags.push(tag.clone());
                        used.insert(tag.clone());
                    }
                }
            }

            out.push(tags);
        }
        out
    }

    // Sanitation pass over an existing block: normalize every tag, drop
    // generics and off-vocabulary tags, dedup globally, and cap the niche tag
    // at one use across the whole response.
    pub fn sanitize(
        &self,
        block: &[Vec<String>],
        niche: &str,
        vocab: &AllowedVocabulary,
    ) -> Vec<Vec<String>> {
        let mut seen: HashSet<String> = HashSet::new();
        let base_niche_tag = niche_tag(niche);
        let mut niche_used = false;

        block
            .iter()
            .map(|row| {
                let mut out_row = Vec::new();
                for raw in row {
                    if out_row.len() >= self.max_per_idea {
                        break;
                    }
                    let tag = text::normalize_hashtag(raw);
                    if !self.accepts(&tag, vocab) {
                        continue;
                    }
                    if seen.contains(&tag) {
                        continue;
                    }
                    if base_niche_tag.as_deref() == Some(tag.as_str()) {
                        if niche_used {
                            continue;
                        }
                        niche_used = true;
                    }
                    seen.insert(tag.clone());
                    out_row.push(tag);
                }
                out_row
            })
            .collect()
    }
}

fn title_tag(title: &str) -> Option<String> {
    text::tokenize(title)
        .into_iter()
        .find(|token| token.len() >= 4)
        .and_then(|token| text::hashtag_from_token(&token))
}
