//! Application configuration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidMicrophonePolicyError;
use crate::domain::recording::{
    EncoderQuality, QualitySettings, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE,
};

/// Default name of the overwritable recording file
pub const DEFAULT_RECORDING_NAME: &str = "myRecording.wav";

/// Default name of the bundled guide track
pub const DEFAULT_GUIDE_TRACK: &str = "music.mp3";

/// Default elapsed-time refresh interval
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default log filter
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How microphone permission is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MicrophonePolicy {
    /// Undetermined until requested; granted when an input device exists
    #[default]
    Ask,
    Allow,
    Deny,
}

impl MicrophonePolicy {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl FromStr for MicrophonePolicy {
    type Err = InvalidMicrophonePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(InvalidMicrophonePolicyError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MicrophonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub recordings_dir: Option<String>,
    pub assets_dir: Option<String>,
    pub recording_name: Option<String>,
    pub guide_track: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
    pub quality: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub notify: Option<bool>,
    pub microphone: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values.
    /// Directories stay unset; they are resolved per platform at startup.
    pub fn defaults() -> Self {
        Self {
            recordings_dir: None,
            assets_dir: None,
            recording_name: Some(DEFAULT_RECORDING_NAME.to_string()),
            guide_track: Some(DEFAULT_GUIDE_TRACK.to_string()),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            channels: Some(DEFAULT_CHANNELS),
            quality: Some(EncoderQuality::default().to_string()),
            tick_interval_ms: Some(DEFAULT_TICK_INTERVAL_MS),
            notify: Some(false),
            microphone: Some(MicrophonePolicy::default().to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            assets_dir: other.assets_dir.or(self.assets_dir),
            recording_name: other.recording_name.or(self.recording_name),
            guide_track: other.guide_track.or(self.guide_track),
            sample_rate: other.sample_rate.or(self.sample_rate),
            channels: other.channels.or(self.channels),
            quality: other.quality.or(self.quality),
            tick_interval_ms: other.tick_interval_ms.or(self.tick_interval_ms),
            notify: other.notify.or(self.notify),
            microphone: other.microphone.or(self.microphone),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get the recording file name, or the default if not set
    pub fn recording_name_or_default(&self) -> &str {
        self.recording_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_RECORDING_NAME)
    }

    /// Get the guide track asset name, or the default if not set
    pub fn guide_track_or_default(&self) -> &str {
        self.guide_track
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_GUIDE_TRACK)
    }

    /// Get quality as parsed EncoderQuality, or default if not set/invalid
    pub fn quality_or_default(&self) -> EncoderQuality {
        self.quality
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Build the recorder settings; zero rates or channels fall back to defaults
    pub fn quality_settings(&self) -> QualitySettings {
        QualitySettings {
            sample_rate: self
                .sample_rate
                .filter(|r| *r > 0)
                .unwrap_or(DEFAULT_SAMPLE_RATE),
            channels: self
                .channels
                .filter(|c| *c > 0)
                .unwrap_or(DEFAULT_CHANNELS),
            quality: self.quality_or_default(),
        }
    }

    /// Get the ticker interval, or 100ms if not set or zero
    pub fn tick_interval_or_default(&self) -> Duration {
        Duration::from_millis(
            self.tick_interval_ms
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TICK_INTERVAL_MS),
        )
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get microphone policy, or ask if not set/invalid
    pub fn microphone_or_default(&self) -> MicrophonePolicy {
        self.microphone
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get log filter, or "info" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.recordings_dir.is_none());
        assert!(config.assets_dir.is_none());
        assert_eq!(config.recording_name, Some("myRecording.wav".to_string()));
        assert_eq!(config.guide_track, Some("music.mp3".to_string()));
        assert_eq!(config.sample_rate, Some(44_100));
        assert_eq!(config.channels, Some(2));
        assert_eq!(config.quality, Some("high".to_string()));
        assert_eq!(config.tick_interval_ms, Some(100));
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.microphone, Some("ask".to_string()));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.recording_name.is_none());
        assert!(config.quality.is_none());
        assert!(config.notify.is_none());
        assert!(config.microphone.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            recording_name: Some("take.wav".to_string()),
            quality: Some("low".to_string()),
            sample_rate: Some(48_000),
            ..Default::default()
        };

        let other = AppConfig {
            recording_name: Some("final.wav".to_string()),
            quality: None, // Should not override
            sample_rate: Some(22_050),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.recording_name, Some("final.wav".to_string()));
        assert_eq!(merged.quality, Some("low".to_string())); // Kept from base
        assert_eq!(merged.sample_rate, Some(22_050));
    }

    #[test]
    fn accessors_fall_back_on_empty() {
        let config = AppConfig::empty();
        assert_eq!(config.recording_name_or_default(), "myRecording.wav");
        assert_eq!(config.guide_track_or_default(), "music.mp3");
        assert_eq!(config.quality_or_default(), EncoderQuality::High);
        assert_eq!(config.tick_interval_or_default(), Duration::from_millis(100));
        assert!(!config.notify_or_default());
        assert_eq!(config.microphone_or_default(), MicrophonePolicy::Ask);
        assert_eq!(config.log_level_or_default(), "info");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig {
            quality: Some("ultra".to_string()),
            microphone: Some("maybe".to_string()),
            tick_interval_ms: Some(0),
            sample_rate: Some(0),
            channels: Some(0),
            recording_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.quality_or_default(), EncoderQuality::High);
        assert_eq!(config.microphone_or_default(), MicrophonePolicy::Ask);
        assert_eq!(config.tick_interval_or_default(), Duration::from_millis(100));
        assert_eq!(config.quality_settings(), QualitySettings::default());
        assert_eq!(config.recording_name_or_default(), "myRecording.wav");
    }

    #[test]
    fn quality_settings_from_config() {
        let config = AppConfig {
            sample_rate: Some(48_000),
            channels: Some(1),
            quality: Some("medium".to_string()),
            ..Default::default()
        };
        let settings = config.quality_settings();
        assert_eq!(settings.sample_rate, 48_000);
        assert_eq!(settings.channels, 1);
        assert_eq!(settings.bits_per_sample(), 16);
    }

    #[test]
    fn microphone_policy_parse() {
        assert_eq!("ALLOW".parse::<MicrophonePolicy>().unwrap(), MicrophonePolicy::Allow);
        assert_eq!("deny".parse::<MicrophonePolicy>().unwrap(), MicrophonePolicy::Deny);
        assert!("sometimes".parse::<MicrophonePolicy>().is_err());
    }
}
