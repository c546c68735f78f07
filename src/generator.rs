use async_trait::async_trait;
use serde_json::Value;

use crate::Draft;

#[derive(Debug, Clone)]
pub enum ChatMessage {
    System(String),
    User(String),
    Assistant(String),
}

impl ChatMessage {
    pub fn role(&self) -> &'static str {
        match self {
            ChatMessage::System(_) => "system",
            ChatMessage::User(_) => "user",
            ChatMessage::Assistant(_) => "assistant",
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChatMessage::System(text) | ChatMessage::User(text) | ChatMessage::Assistant(text) => {
                text
            }
        }
    }
}

// The generative-text capability, supplied by the caller. The engine calls it
// at most twice per request: one generation plus one optional repair.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: &[ChatMessage], temperature: f64) -> Result<String, String>;
}

// Models wrap the JSON in prose or code fences; keep only the outermost
// object and ignore everything around it.
pub fn extract_json(text: &str) -> Option<String> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let trimmed = cleaned.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if start >= end {
        return None;
    }
    Some(trimmed[start..=end].to_string())
}

pub fn parse_draft(raw: &str) -> Result<Draft, String> {
    let json = extract_json(raw).ok_or_else(|| "response carries no JSON object".to_string())?;
    let value: Value =
        serde_json::from_str(&json).map_err(|err| format!("draft parse failed: {}", err))?;
    let object = value
        .as_object()
        .ok_or_else(|| "draft payload is not an object".to_string())?;

    let recommendation = object
        .get("recommendation")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let reason = object
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let ideas: Vec<String> = object
        .get("ideas")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    // A block where any row is not a list of strings is discarded wholesale;
    // the validator re-derives it from the ideas.
    let hashtags_for_ideas: Vec<Vec<String>> = match object.get("hashtags_for_ideas") {
        Some(Value::Array(rows)) => {
            let mut block = Vec::with_capacity(rows.len());
            let mut well_formed = true;
            for row in rows {
                match row.as_array() {
                    Some(tags) => block.push(
                        tags.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                    ),
                    None => {
                        well_formed = false;
                        break;
                    }
                }
            }
            if well_formed {
                block
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    };

    Ok(Draft {
        recommendation,
        reason,
        ideas,
        hashtags_for_ideas,
    })
}
