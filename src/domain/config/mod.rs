//! Configuration value objects

mod app_config;

pub use app_config::{
    AppConfig, MicrophonePolicy, DEFAULT_GUIDE_TRACK, DEFAULT_LOG_LEVEL, DEFAULT_RECORDING_NAME,
    DEFAULT_TICK_INTERVAL_MS,
};
