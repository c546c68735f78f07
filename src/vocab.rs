use std::collections::HashSet;

use crate::text;

// Terms too generic to anchor a hashtag, excluded no matter how often the
// context repeats them.
pub const JUNK_TOKENS: &[&str] = &["checklist", "tips", "tutorial", "guide", "course", "content"];

const LOOSE_MATCH_MIN_LEN: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct AllowedVocabulary {
    tokens: HashSet<String>,
}

impl AllowedVocabulary {
    // Rebuilt for every request from that request's own context; never cached
    // across niches.
    pub fn build(
        niche: &str,
        specialties: &[String],
        glossary: &[String],
        expanded_specialties: &[String],
        idea_titles: &[String],
    ) -> Self {
        let mut tokens = HashSet::new();
        let mut absorb = |value: &str| {
            for token in text::tokenize(value) {
                tokens.insert(token);
            }
        };

        absorb(niche);
        for specialty in specialties {
            absorb(specialty);
        }
        for term in glossary {
            absorb(term);
        }
        for term in expanded_specialties {
            absorb(term);
        }
        for title in idea_titles {
            absorb(title);
        }

        for junk in JUNK_TOKENS {
            tokens.remove(*junk);
        }

        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    // Exact membership, or a loose substring match against entries of at
    // least 4 characters so plural/singular drift does not over-filter.
    // An empty vocabulary means no usable context arrived; it does not
    // constrain.
    pub fn allows(&self, token: &str) -> bool {
        if self.tokens.is_empty() {
            return true;
        }
        if self.tokens.contains(token) {
            return true;
        }
        self.tokens
            .iter()
            .any(|entry| entry.len() >= LOOSE_MATCH_MIN_LEN && token.contains(entry.as_str()))
    }
}
