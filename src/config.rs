//! Configuration for the switchboard
//!
//! Values can come from code ([`ConfigBuilder`]), the environment
//! ([`from_env`]) or a TOML file ([`from_file`]).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::Result;
use crate::realtime::TurnDetection;
use crate::template::TemplateParams;

/// Placeholder name for the configured language.
pub const LANGUAGE_PARAM: &str = "language";

/// Switchboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Language substituted for `{language}` in agent instructions
    pub language: String,

    /// Extra placeholder values available to every agent's instructions
    pub template_params: BTreeMap<String, String>,

    /// Turn detection attached to session updates on agent switch. In TOML,
    /// `"server_vad"` or a `{ type = "server_vad" }` table enables it and
    /// `"none"` turns it off.
    #[serde(
        serialize_with = "serialize_turn_detection",
        deserialize_with = "deserialize_turn_detection"
    )]
    pub turn_detection: Option<TurnDetection>,

    /// Upper bound for a single tool handler call, in milliseconds
    pub tool_timeout_ms: Option<u64>,
}

impl Default for SwitchboardConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            template_params: BTreeMap::new(),
            turn_detection: Some(TurnDetection::ServerVad),
            tool_timeout_ms: None,
        }
    }
}

impl SwitchboardConfig {
    /// Parameters used to format agent instructions. `language` always wins
    /// over an entry of the same name in `template_params`.
    pub fn template_params(&self) -> TemplateParams {
        let mut params = self.template_params.clone();
        params.insert(LANGUAGE_PARAM.to_string(), self.language.clone());
        params
    }

    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_ms.map(Duration::from_millis)
    }
}

/// Configuration builder
pub struct ConfigBuilder {
    config: SwitchboardConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SwitchboardConfig::default(),
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    pub fn template_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.template_params.insert(name.into(), value.into());
        self
    }

    pub fn turn_detection(mut self, turn_detection: Option<TurnDetection>) -> Self {
        self.config.turn_detection = turn_detection;
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config.tool_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn build(self) -> SwitchboardConfig {
        self.config
    }
}

/// Parse a turn-detection setting; `Some(None)` means disabled.
fn parse_turn_detection(value: &str) -> Option<Option<TurnDetection>> {
    match value.trim().to_lowercase().as_str() {
        "server_vad" => Some(Some(TurnDetection::ServerVad)),
        "none" | "off" => Some(None),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TurnDetectionSetting {
    Named(String),
    Detection(TurnDetection),
}

fn deserialize_turn_detection<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<TurnDetection>, D::Error>
where
    D: Deserializer<'de>,
{
    match TurnDetectionSetting::deserialize(deserializer)? {
        TurnDetectionSetting::Detection(detection) => Ok(Some(detection)),
        TurnDetectionSetting::Named(name) => parse_turn_detection(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown turn detection: {name}"))),
    }
}

fn serialize_turn_detection<S>(
    value: &Option<TurnDetection>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(detection) => detection.serialize(serializer),
        None => serializer.serialize_str("none"),
    }
}

/// Load configuration from environment variables
pub fn from_env() -> SwitchboardConfig {
    from_vars(|name| std::env::var(name).ok())
}

fn from_vars(var: impl Fn(&str) -> Option<String>) -> SwitchboardConfig {
    let mut config = SwitchboardConfig::default();

    if let Some(language) = var("SWITCHBOARD_LANGUAGE") {
        if !language.trim().is_empty() {
            config.language = language;
        }
    }

    if let Some(timeout) = var("SWITCHBOARD_TOOL_TIMEOUT_SECS") {
        match timeout.trim().parse::<u64>().ok().and_then(|secs| secs.checked_mul(1000)) {
            Some(ms) => config.tool_timeout_ms = Some(ms),
            None => tracing::warn!(value = %timeout, "Ignoring invalid SWITCHBOARD_TOOL_TIMEOUT_SECS"),
        }
    }

    if let Some(detection) = var("SWITCHBOARD_TURN_DETECTION") {
        match parse_turn_detection(&detection) {
            Some(setting) => config.turn_detection = setting,
            None => tracing::warn!(value = %detection, "Ignoring unknown SWITCHBOARD_TURN_DETECTION"),
        }
    }

    config
}

/// Load configuration from a TOML file
pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<SwitchboardConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: SwitchboardConfig = toml::from_str(&contents)?;
    Ok(config)
}
