//! Interactive session runner

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use crate::application::ports::{
    ConfigStore, FileStore, Notifier, PermissionProvider, Player, Recorder, SessionView, Ticker,
};
use crate::application::{
    event_channel, EventReceiver, RecordPlaySession, SessionConfig, SessionPorts,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::{
    create_notifier, create_recorder, CpalPermissionProvider, DocumentsFileStore, IntervalTicker,
    RodioPlayer,
};

use super::input::spawn_stdin_reader;
use super::presenter::Presenter;
use super::signals::forward_shutdown_signals;
use super::terminal_view::TerminalView;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment overrides for the directories
pub const ENV_RECORDINGS_DIR: &str = "RECORD_PLAY_RECORDINGS_DIR";
pub const ENV_ASSETS_DIR: &str = "RECORD_PLAY_ASSETS_DIR";

/// Run the interactive record/play session until quit or signal
pub async fn run_session(config: AppConfig) -> ExitCode {
    let presenter = Presenter::new();

    let log_guard = match logging::default_log_dir()
        .and_then(|dir| logging::init(&dir, config.log_level_or_default()))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            presenter.warn(&format!("Logging disabled: {}", e));
            None
        }
    };

    let (events, receiver) = event_channel();

    if let Err(e) = forward_shutdown_signals(events.clone()) {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let view = Arc::new(TerminalView::new());
    let files = DocumentsFileStore::from_config(&config);
    let session_config = SessionConfig {
        recording_name: config.recording_name_or_default().to_string(),
        guide_track: config.guide_track_or_default().to_string(),
        settings: config.quality_settings(),
    };

    let recording = files.overwritable_file_reference(&session_config.recording_name);
    let guide = files.bundled_asset_reference(&session_config.guide_track);
    presenter.info(&format!("Recording to {}", recording));
    if !files.exists(&guide) {
        presenter.warn(&format!("No guide track at {}; recording without it", guide));
    }
    presenter.command_help();

    let ports = SessionPorts {
        recorder: create_recorder(),
        player: RodioPlayer::new(),
        ticker: IntervalTicker::new(config.tick_interval_or_default(), events.clone()),
        files,
        notifier: create_notifier(view.status_line(), config.notify_or_default()),
        view: Arc::clone(&view),
        permission: CpalPermissionProvider::new(config.microphone_or_default()),
    };
    let session = RecordPlaySession::new(ports, session_config, events.clone());

    let status_line = view.status_line();
    let help_line = status_line.clone();
    spawn_stdin_reader(
        events,
        move || help_line.suspend(|| Presenter::new().command_help()),
        move |e| status_line.suspend(|| Presenter::new().warn(&e.to_string())),
    );

    tracing::info!(file = %recording, "session starting");

    // Stopping joins the audio threads, so the loop runs off the async
    // workers.
    let outcome = tokio::task::spawn_blocking(move || drive_session(session, receiver)).await;
    view.finish();

    let code = match outcome {
        Ok(()) => {
            tracing::info!("session ended");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "session loop failed");
            presenter.error(&format!("Session loop failed: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    };

    // Flushes the last log lines
    drop(log_guard);
    code
}

/// Activate the session and feed it events until it shuts down
fn drive_session<R, P, T, F, N, V, K>(
    mut session: RecordPlaySession<R, P, T, F, N, V, K>,
    mut receiver: EventReceiver,
) where
    R: Recorder,
    P: Player,
    T: Ticker,
    F: FileStore,
    N: Notifier,
    V: SessionView,
    K: PermissionProvider,
{
    session.activate();
    while let Some(event) = receiver.blocking_recv() {
        if !session.handle(event) {
            return;
        }
    }
    session.shutdown();
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let presenter = Presenter::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// Directory overrides from the environment
fn env_config() -> AppConfig {
    AppConfig {
        recordings_dir: env::var(ENV_RECORDINGS_DIR).ok().filter(|s| !s.is_empty()),
        assets_dir: env::var(ENV_ASSETS_DIR).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    #[tokio::test]
    async fn merged_config_layers_file_under_cli() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        store
            .save(&AppConfig {
                quality: Some("low".into()),
                channels: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        let cli = AppConfig {
            quality: Some("medium".into()),
            ..Default::default()
        };
        let config = load_merged_config(&store, cli).await;

        assert_eq!(config.quality.as_deref(), Some("medium"));
        assert_eq!(config.channels, Some(1));
        assert_eq!(config.sample_rate, Some(44100));
        assert_eq!(config.recording_name.as_deref(), Some("myRecording.wav"));
    }

    #[tokio::test]
    async fn unreadable_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let store = XdgConfigStore::with_path(path);

        let config = load_merged_config(&store, AppConfig::empty()).await;
        assert_eq!(config.tick_interval_ms, Some(100));
    }
}
