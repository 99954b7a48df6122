//! Recording quality settings

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidQualityError;

/// Default sample rate of the recording file
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default channel count of the recording file
pub const DEFAULT_CHANNELS: u16 = 2;

/// Encoder quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncoderQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl EncoderQuality {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// PCM bit depth used for this quality
    pub const fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Low => 8,
            Self::Medium => 16,
            Self::High => 24,
        }
    }

    /// All quality levels
    pub const fn all() -> &'static [EncoderQuality] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

impl FromStr for EncoderQuality {
    type Err = InvalidQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(InvalidQualityError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for EncoderQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings handed to the recorder when a recording starts.
///
/// These pass straight through to the encoder; the session never inspects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualitySettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub quality: EncoderQuality,
}

impl QualitySettings {
    /// Bits per sample written to the file
    pub const fn bits_per_sample(&self) -> u16 {
        self.quality.bits_per_sample()
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            quality: EncoderQuality::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cd_stereo_high() {
        let settings = QualitySettings::default();
        assert_eq!(settings.sample_rate, 44_100);
        assert_eq!(settings.channels, 2);
        assert_eq!(settings.quality, EncoderQuality::High);
        assert_eq!(settings.bits_per_sample(), 24);
    }

    #[test]
    fn parse_quality_case_insensitive() {
        assert_eq!("LOW".parse::<EncoderQuality>().unwrap(), EncoderQuality::Low);
        assert_eq!(
            " medium ".parse::<EncoderQuality>().unwrap(),
            EncoderQuality::Medium
        );
    }

    #[test]
    fn parse_quality_invalid() {
        let err = "ultra".parse::<EncoderQuality>().unwrap_err();
        assert!(err.to_string().contains("ultra"));
    }

    #[test]
    fn quality_display_round_trips() {
        for quality in EncoderQuality::all() {
            assert_eq!(quality.to_string().parse::<EncoderQuality>().unwrap(), *quality);
        }
    }
}
