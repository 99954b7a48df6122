//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::MicrophonePolicy;
use crate::domain::recording::EncoderQuality;

/// RecordPlay - record over a guide track and play it back
#[derive(Parser, Debug)]
#[command(name = "record-play")]
#[command(version)]
#[command(about = "Record the microphone over a guide track and play the take back")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory the recording is written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub recordings_dir: Option<String>,

    /// Directory holding bundled assets such as the guide track
    #[arg(short = 'a', long, value_name = "DIR")]
    pub assets_dir: Option<String>,

    /// Guide track file name inside the assets directory
    #[arg(short = 'g', long, value_name = "FILE")]
    pub guide_track: Option<String>,

    /// Encoder quality (sets WAV bit depth: low=8, medium=16, high=24)
    #[arg(short = 'q', long, value_name = "QUALITY")]
    pub quality: Option<QualityArg>,

    /// Microphone access policy
    #[arg(short = 'm', long, value_name = "POLICY")]
    pub microphone: Option<MicrophoneArg>,

    /// Also show errors as desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH", env = "RECORD_PLAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Quality argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for EncoderQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => EncoderQuality::Low,
            QualityArg::Medium => EncoderQuality::Medium,
            QualityArg::High => EncoderQuality::High,
        }
    }
}

/// Microphone policy argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MicrophoneArg {
    Ask,
    Allow,
    Deny,
}

impl From<MicrophoneArg> for MicrophonePolicy {
    fn from(arg: MicrophoneArg) -> Self {
        match arg {
            MicrophoneArg::Ask => MicrophonePolicy::Ask,
            MicrophoneArg::Allow => MicrophonePolicy::Allow,
            MicrophoneArg::Deny => MicrophonePolicy::Deny,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "recordings_dir",
    "assets_dir",
    "recording_name",
    "guide_track",
    "sample_rate",
    "channels",
    "quality",
    "tick_interval_ms",
    "notify",
    "microphone",
    "log_level",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
