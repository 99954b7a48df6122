//! RecordPlay CLI entry point

use std::process::ExitCode;

use clap::Parser;

use record_play::cli::{
    app::{load_merged_config, run_session, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use record_play::domain::config::{AppConfig, MicrophonePolicy};
use record_play::domain::recording::EncoderQuality;
use record_play::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    let store = match cli.config.clone() {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    };

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        recordings_dir: cli.recordings_dir.clone(),
        assets_dir: cli.assets_dir.clone(),
        guide_track: cli.guide_track.clone(),
        quality: cli.quality.map(|q| EncoderQuality::from(q).to_string()),
        microphone: cli.microphone.map(|m| MicrophonePolicy::from(m).to_string()),
        notify: if cli.notify { Some(true) } else { None },
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(&store, cli_config).await;

    if let Some(quality) = config.quality.as_deref() {
        if let Err(e) = quality.parse::<EncoderQuality>() {
            presenter.error(&format!("Invalid quality: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }
    if let Some(policy) = config.microphone.as_deref() {
        if let Err(e) = policy.parse::<MicrophonePolicy>() {
            presenter.error(&format!("Invalid microphone policy: {}", e));
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    run_session(config).await
}
