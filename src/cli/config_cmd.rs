//! Config command handler

use tracing_subscriber::EnvFilter;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, MicrophonePolicy};
use crate::domain::error::ConfigError;
use crate::domain::recording::EncoderQuality;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Store a validated value under `key`
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "recordings_dir" => config.recordings_dir = Some(value.to_string()),
        "assets_dir" => config.assets_dir = Some(value.to_string()),
        "recording_name" => config.recording_name = Some(value.to_string()),
        "guide_track" => config.guide_track = Some(value.to_string()),
        "sample_rate" => config.sample_rate = Some(parse_number(key, value)?),
        "channels" => config.channels = Some(parse_number(key, value)?),
        "quality" => config.quality = Some(value.to_lowercase()),
        "tick_interval_ms" => config.tick_interval_ms = Some(parse_number(key, value)?),
        "notify" => {
            config.notify =
                Some(parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?)
        }
        "microphone" => config.microphone = Some(value.to_lowercase()),
        "log_level" => config.log_level = Some(value.to_string()),
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Read the value under `key` as display text
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "recordings_dir" => config.recordings_dir.clone(),
        "assets_dir" => config.assets_dir.clone(),
        "recording_name" => config.recording_name.clone(),
        "guide_track" => config.guide_track.clone(),
        "sample_rate" => config.sample_rate.map(|v| v.to_string()),
        "channels" => config.channels.map(|v| v.to_string()),
        "quality" => config.quality.clone(),
        "tick_interval_ms" => config.tick_interval_ms.map(|v| v.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "microphone" => config.microphone.clone(),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "recordings_dir" | "assets_dir" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Directory must not be empty"));
            }
        }
        "recording_name" | "guide_track" => {
            if value.trim().is_empty() || value.contains(['/', '\\']) {
                return Err(invalid(key, "Must be a plain file name"));
            }
        }
        "sample_rate" => {
            let rate: u32 = parse_number(key, value)?;
            if !(8_000..=192_000).contains(&rate) {
                return Err(invalid(key, "Sample rate must be between 8000 and 192000"));
            }
        }
        "channels" => {
            let channels: u16 = parse_number(key, value)?;
            if !(1..=8).contains(&channels) {
                return Err(invalid(key, "Channels must be between 1 and 8"));
            }
        }
        "tick_interval_ms" => {
            let ms: u64 = parse_number(key, value)?;
            if ms == 0 {
                return Err(invalid(key, "Interval must be greater than zero"));
            }
        }
        "quality" => {
            value
                .parse::<EncoderQuality>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "microphone" => {
            value
                .parse::<MicrophonePolicy>()
                .map_err(|e| invalid(key, e.to_string()))?;
        }
        "notify" => {
            parse_bool(value).map_err(|_| invalid(key, "Value must be 'true' or 'false'"))?;
        }
        "log_level" => {
            EnvFilter::try_new(value).map_err(|e| invalid(key, e.to_string()))?;
        }
        _ => {}
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, format!("'{}' is not a valid number", value)))
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
