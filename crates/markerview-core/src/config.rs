//! Page configuration
//!
//! Defaults can be overridden from TOML and then from the page URL's query
//! string (e.g. `?dataset=targets/stadium.mind&lost=clear`).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::session::{LostPolicy, ANIMATION_STEP, ROTATE_STEP};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}

/// Constraints passed to `getUserMedia`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConstraints {
    #[serde(default = "default_width")]
    pub ideal_width: u32,
    #[serde(default = "default_height")]
    pub ideal_height: u32,
    /// "environment" for the rear camera, "user" for the front one
    #[serde(default = "default_facing_mode")]
    pub facing_mode: String,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: default_width(),
            ideal_height: default_height(),
            facing_mode: default_facing_mode(),
        }
    }
}

impl CameraConstraints {
    /// The `video` member of a MediaStreamConstraints dictionary
    pub fn to_video_json(&self) -> serde_json::Value {
        serde_json::json!({
            "width": { "ideal": self.ideal_width },
            "height": { "ideal": self.ideal_height },
            "facingMode": self.facing_mode,
        })
    }
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_facing_mode() -> String {
    "environment".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArConfig {
    /// URL of the compiled marker dataset
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
    /// Markers tracked simultaneously by the tracker
    #[serde(default = "default_max_track")]
    pub max_track: u32,
    #[serde(default)]
    pub camera: CameraConstraints,
    /// Manual rotation step in radians
    #[serde(default = "default_rotation_step")]
    pub rotation_step: f32,
    /// Per-frame yaw increment in radians while animating
    #[serde(default = "default_animation_step")]
    pub animation_step: f32,
    /// Delay before the quiz moves on after an answer
    #[serde(default = "default_answer_advance_ms")]
    pub answer_advance_ms: u64,
    #[serde(default)]
    pub lost_policy: LostPolicy,
    /// Max log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ArConfig {
    fn default() -> Self {
        Self {
            dataset_url: default_dataset_url(),
            max_track: default_max_track(),
            camera: CameraConstraints::default(),
            rotation_step: default_rotation_step(),
            animation_step: default_animation_step(),
            answer_advance_ms: default_answer_advance_ms(),
            lost_policy: LostPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_dataset_url() -> String {
    "targets/targets.mind".to_string()
}

fn default_max_track() -> u32 {
    1
}

fn default_rotation_step() -> f32 {
    ROTATE_STEP
}

fn default_animation_step() -> f32 {
    ANIMATION_STEP
}

fn default_answer_advance_ms() -> u64 {
    1500
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl ArConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn answer_advance_delay(&self) -> Duration {
        Duration::from_millis(self.answer_advance_ms)
    }

    /// Apply overrides from a URL query string (with or without the `?`)
    pub fn apply_query(&mut self, search: &str) -> Result<(), ConfigError> {
        if let Some(dataset) = parse_query_param(search, "dataset") {
            tracing::info!("Using marker dataset from URL parameter: {}", dataset);
            self.dataset_url = dataset;
        }
        if let Some(lost) = parse_query_param(search, "lost") {
            self.lost_policy = match lost.as_str() {
                "keep_last" => LostPolicy::KeepLast,
                "clear" => LostPolicy::Clear,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "lost".to_string(),
                        value: lost.clone(),
                    })
                }
            };
        }
        if let Some(max_track) = parse_query_param(search, "max_track") {
            self.max_track = max_track
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "max_track".to_string(),
                    value: max_track,
                })?;
        }
        if let Some(level) = parse_query_param(search, "log") {
            self.log_level = level;
        }
        Ok(())
    }
}

/// Parse a query parameter from a search string
pub fn parse_query_param(search: &str, param: &str) -> Option<String> {
    let search = search.trim_start_matches('?');
    for pair in search.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(key), Some(value)) = (parts.next(), parts.next()) {
            if key == param {
                return Some(value.replace("%3A", ":").replace("%2F", "/"));
            }
        }
    }
    None
}
