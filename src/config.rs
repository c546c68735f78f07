use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub low_ctr_threshold: f64,
    pub low_reach_threshold: f64,
    pub reach_follower_share: f64,
    pub low_impressions_threshold: f64,
    pub retention_ok_threshold: f64,
    pub low_ctr_weight: f64,
    pub low_reach_weight: f64,
    pub retention_ok_weight: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            low_ctr_threshold: 0.04,
            low_reach_threshold: 1000.0,
            reach_follower_share: 0.2,
            low_impressions_threshold: 2000.0,
            retention_ok_threshold: 0.45,
            low_ctr_weight: 0.55,
            low_reach_weight: 0.35,
            retention_ok_weight: 0.10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub weak_retention_threshold: f64,
    pub weak_watch_threshold: f64,
    pub weak_completion_threshold: f64,
    pub low_engagement_floor: u64,
    pub low_freq_threshold: f64,
    pub weak_watch_weight: f64,
    pub low_engagement_weight: f64,
    pub low_freq_weight: f64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            weak_retention_threshold: 0.40,
            weak_watch_threshold: 0.40,
            weak_completion_threshold: 0.30,
            low_engagement_floor: 10,
            low_freq_threshold: 2.0,
            weak_watch_weight: 0.60,
            low_engagement_weight: 0.25,
            low_freq_weight: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub traffic_ctr_threshold: f64,
    pub traffic_clicks_floor: u64,
    pub low_conversion_rate: f64,
    pub zero_conversion_clicks: u64,
    pub reach_floor: f64,
    pub impressions_floor: f64,
    pub traffic_weight: f64,
    pub low_conversion_weight: f64,
    pub reach_weight: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            traffic_ctr_threshold: 0.05,
            traffic_clicks_floor: 50,
            low_conversion_rate: 0.02,
            zero_conversion_clicks: 20,
            reach_floor: 1000.0,
            impressions_floor: 2000.0,
            traffic_weight: 0.50,
            low_conversion_weight: 0.35,
            reach_weight: 0.15,
        }
    }
}

// Engagement-based retention proxy: weighted interactions over impressions
// (or followers), boosted and clamped to a conservative band so sparse
// engagement never implies near-total retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionProxyConfig {
    pub like_weight: f64,
    pub comment_weight: f64,
    pub share_weight: f64,
    pub save_weight: f64,
    pub boost: f64,
    pub floor: f64,
    pub ceiling: f64,
}

impl Default for RetentionProxyConfig {
    fn default() -> Self {
        Self {
            like_weight: 1.0,
            comment_weight: 1.5,
            share_weight: 1.5,
            save_weight: 2.0,
            boost: 1.5,
            floor: 0.10,
            ceiling: 0.70,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    pub min_ideas: usize,
    pub max_ideas: usize,
    pub reason_bullets: usize,
    pub max_hashtags_per_idea: usize,
    pub min_hashtag_len: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_ideas: 10,
            max_ideas: 12,
            reason_bullets: 4,
            max_hashtags_per_idea: 3,
            min_hashtag_len: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f64,
    pub repair_temperature: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "qwen2.5:7b-instruct".to_string(),
            timeout_ms: 120_000,
            temperature: 0.7,
            repair_temperature: 0.4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub discovery: DiscoveryConfig,
    pub retention: RetentionConfig,
    pub conversion: ConversionConfig,
    pub proxy: RetentionProxyConfig,
    pub validator: ValidatorConfig,
    pub generator: GeneratorConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                toml::from_str(&contents)
                    .map_err(|err| format!("failed to parse config: {}", err))?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var("GENERATOR_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.generator.endpoint = endpoint;
            }
        }
        if let Ok(model) = env::var("GENERATOR_MODEL") {
            if !model.trim().is_empty() {
                self.generator.model = model;
            }
        }
        if let Ok(timeout) = env::var("GENERATOR_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.generator.timeout_ms = value;
            }
        }
        if let Ok(temperature) = env::var("GENERATOR_TEMPERATURE") {
            if let Ok(value) = temperature.parse::<f64>() {
                self.generator.temperature = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("FOCUS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/focus.toml")))
}
