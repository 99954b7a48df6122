//! Record/play session use case
//!
//! Drives the recorder, the player and the ticker from serialized
//! [`SessionEvent`]s and mirrors the result into the view. Every failure
//! returns the session to a consistent state and shows exactly one alert.

use crate::domain::error::SessionError;
use crate::domain::recording::{ElapsedTime, FileRef, QualitySettings};
use crate::domain::config::{DEFAULT_GUIDE_TRACK, DEFAULT_RECORDING_NAME};
use crate::domain::session::{InvalidStateTransition, SessionMachine, SessionState};

use super::events::{EventSender, SessionEvent};
use super::ports::{
    FileStore, Notifier, PermissionProvider, PermissionStatus, Player, Recorder, SessionView,
    Ticker,
};

/// Record control text while idle
pub const RECORD_LABEL: &str = "Record";
/// Record control text while recording
pub const STOP_LABEL: &str = "Stop";
/// Play control text while not playing
pub const PLAY_LABEL: &str = "Play";
/// Play control text while playing
pub const PAUSE_LABEL: &str = "Pause";

/// What the session records to and plays along with
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the overwritable recording file
    pub recording_name: String,
    /// Name of the bundled guide track
    pub guide_track: String,
    /// Settings passed through to the recorder
    pub settings: QualitySettings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recording_name: DEFAULT_RECORDING_NAME.to_string(),
            guide_track: DEFAULT_GUIDE_TRACK.to_string(),
            settings: QualitySettings::default(),
        }
    }
}

/// The collaborators a session drives
pub struct SessionPorts<R, P, T, F, N, V, K> {
    pub recorder: R,
    pub player: P,
    pub ticker: T,
    pub files: F,
    pub notifier: N,
    pub view: V,
    pub permission: K,
}

/// Record/play session
pub struct RecordPlaySession<R, P, T, F, N, V, K>
where
    R: Recorder,
    P: Player,
    T: Ticker,
    F: FileStore,
    N: Notifier,
    V: SessionView,
    K: PermissionProvider,
{
    recorder: R,
    player: P,
    ticker: T,
    files: F,
    notifier: N,
    view: V,
    permission: K,
    machine: SessionMachine,
    events: EventSender,
    recording_file: FileRef,
    guide_track: FileRef,
    settings: QualitySettings,
    permission_status: PermissionStatus,
    permission_pending: bool,
    // Bumped on every recording start/exit; stale ticks and failures are dropped.
    recording_generation: u64,
    // Bumped on every player load/stop; stale completions are dropped.
    playback_generation: u64,
    guide_playing: bool,
}

impl<R, P, T, F, N, V, K> RecordPlaySession<R, P, T, F, N, V, K>
where
    R: Recorder,
    P: Player,
    T: Ticker,
    F: FileStore,
    N: Notifier,
    V: SessionView,
    K: PermissionProvider,
{
    /// Create a new idle session
    pub fn new(
        ports: SessionPorts<R, P, T, F, N, V, K>,
        config: SessionConfig,
        events: EventSender,
    ) -> Self {
        let recording_file = ports.files.overwritable_file_reference(&config.recording_name);
        let guide_track = ports.files.bundled_asset_reference(&config.guide_track);

        Self {
            recorder: ports.recorder,
            player: ports.player,
            ticker: ports.ticker,
            files: ports.files,
            notifier: ports.notifier,
            view: ports.view,
            permission: ports.permission,
            machine: SessionMachine::new(),
            events,
            recording_file,
            guide_track,
            settings: config.settings,
            permission_status: PermissionStatus::Undetermined,
            permission_pending: false,
            recording_generation: 0,
            playback_generation: 0,
            guide_playing: false,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    /// Last known microphone permission
    pub fn permission_status(&self) -> PermissionStatus {
        self.permission_status
    }

    /// The file each recording overwrites
    pub fn recording_file(&self) -> &FileRef {
        &self.recording_file
    }

    /// The bundled track played while recording
    pub fn guide_track(&self) -> &FileRef {
        &self.guide_track
    }

    /// Reset the view and check microphone permission, requesting it if undetermined.
    pub fn activate(&mut self) {
        self.view.set_record_label(RECORD_LABEL);
        self.view.set_play_label(PLAY_LABEL);
        self.view.set_elapsed_label(&ElapsedTime::ZERO.to_string());
        self.view.set_record_enabled(true);

        self.permission_status = self.permission.query_microphone_permission();
        tracing::info!(status = ?self.permission_status, "microphone permission checked");
        if self.permission_status == PermissionStatus::Undetermined {
            self.request_permission();
        }
    }

    /// Process one event. Returns false once the session has shut down.
    pub fn handle(&mut self, event: SessionEvent) -> bool {
        tracing::trace!(?event, state = %self.state(), "handling event");
        match event {
            SessionEvent::ToggleRecord => self.toggle_record(),
            SessionEvent::TogglePlay => self.toggle_play(),
            SessionEvent::Tick { generation } => self.tick(generation),
            SessionEvent::RecorderFailed { generation, reason } => {
                self.recorder_failed(generation, reason)
            }
            SessionEvent::PlaybackFinished { generation } => self.playback_finished(generation),
            SessionEvent::PermissionResolved { granted } => self.permission_resolved(granted),
            SessionEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Record control: start recording, or stop the one in progress.
    /// While playing, playback is stopped first.
    pub fn toggle_record(&mut self) {
        match self.machine.state() {
            SessionState::Recording => self.stop_recording(),
            SessionState::Playing => {
                self.stop_playback();
                self.start_recording();
            }
            SessionState::Idle => self.start_recording(),
        }
    }

    /// Play control: play the recording, or stop playback. Ignored while recording.
    pub fn toggle_play(&mut self) {
        match self.machine.state() {
            SessionState::Recording => {
                tracing::debug!("play ignored while recording");
            }
            SessionState::Playing => self.stop_playback(),
            SessionState::Idle => {
                if let Err(err) = self.try_start_playback() {
                    self.report(err);
                }
            }
        }
    }

    /// Refresh the elapsed-time readout
    pub fn tick(&mut self, generation: u64) {
        if !self.machine.is_recording() || generation != self.recording_generation {
            tracing::trace!(generation, "stale tick dropped");
            return;
        }
        let elapsed = ElapsedTime::from_secs_f64(self.recorder.current_elapsed_seconds());
        tracing::trace!(%elapsed, level = self.recorder.current_level(), "tick");
        self.view.set_elapsed_label(&elapsed.to_string());
    }

    /// The recorder gave up on its own: discard the take and go idle.
    pub fn recorder_failed(&mut self, generation: u64, reason: String) {
        if !self.machine.is_recording() || generation != self.recording_generation {
            tracing::debug!(generation, %reason, "stale recorder failure dropped");
            return;
        }

        self.ticker.stop();
        self.recording_generation += 1;
        self.recorder.cancel();
        self.stop_guide_track();
        self.apply(SessionMachine::fail_recording);
        self.view.set_record_label(RECORD_LABEL);

        self.report(SessionError::RecorderRuntimeFailure(reason));
    }

    /// The player reached the end of the current file
    pub fn playback_finished(&mut self, generation: u64) {
        if generation != self.playback_generation {
            tracing::debug!(generation, "stale playback completion dropped");
            return;
        }

        match self.machine.state() {
            SessionState::Playing => {
                self.apply(SessionMachine::finish_playing);
                self.view.set_play_label(PLAY_LABEL);
                self.view.set_record_enabled(true);
                tracing::info!("playback finished");
            }
            SessionState::Recording => {
                self.guide_playing = false;
                self.view.set_record_enabled(true);
                tracing::debug!("guide track finished");
            }
            SessionState::Idle => {}
        }
    }

    /// Store the answer to a permission request
    pub fn permission_resolved(&mut self, granted: bool) {
        self.permission_pending = false;
        self.permission_status = PermissionStatus::from_granted(granted);
        tracing::info!(granted, "microphone permission resolved");
    }

    /// Finish whatever is in progress: a recording is finalized, playback stopped.
    pub fn shutdown(&mut self) {
        match self.machine.state() {
            SessionState::Recording => self.stop_recording(),
            SessionState::Playing => self.stop_playback(),
            SessionState::Idle => {}
        }
        self.ticker.stop();
    }

    fn start_recording(&mut self) {
        if let Err(err) = self.try_start_recording() {
            self.report(err);
        }
    }

    fn try_start_recording(&mut self) -> Result<(), SessionError> {
        match self.permission_status {
            PermissionStatus::Granted => {}
            PermissionStatus::Denied => return Err(SessionError::PermissionDenied),
            PermissionStatus::Undetermined => {
                self.request_permission();
                return Err(SessionError::PermissionDenied);
            }
        }

        self.recording_generation += 1;
        let generation = self.recording_generation;
        let events = self.events.clone();
        self.recorder.on_failure(Box::new(move |reason| {
            events.send(SessionEvent::RecorderFailed { generation, reason });
        }));

        self.recorder
            .start(&self.recording_file, &self.settings)
            .map_err(|e| SessionError::RecorderInitFailure(e.to_string()))?;

        self.apply(SessionMachine::start_recording);
        tracing::info!(file = %self.recording_file, "recording started");

        self.start_guide_track();
        self.ticker.start(generation);
        self.view.set_elapsed_label(&ElapsedTime::ZERO.to_string());
        self.view.set_record_label(STOP_LABEL);
        Ok(())
    }

    fn stop_recording(&mut self) {
        self.ticker.stop();
        self.recording_generation += 1;
        let result = self.recorder.stop();
        self.stop_guide_track();
        self.apply(SessionMachine::stop_recording);
        self.view.set_record_label(RECORD_LABEL);

        match result {
            Ok(()) => tracing::info!(file = %self.recording_file, "recorded successfully"),
            Err(e) => self.report(SessionError::RecorderRuntimeFailure(e.to_string())),
        }
    }

    fn start_guide_track(&mut self) {
        if !self.files.exists(&self.guide_track) {
            tracing::debug!(file = %self.guide_track, "no guide track bundled");
            return;
        }

        self.player.stop();
        self.register_completion();
        let started = self
            .player
            .load(&self.guide_track)
            .and_then(|()| self.player.play());

        match started {
            Ok(()) => self.guide_playing = true,
            Err(e) => {
                self.player.stop();
                self.report(SessionError::PlayerInitFailure(e.to_string()));
            }
        }
    }

    fn stop_guide_track(&mut self) {
        if self.guide_playing {
            self.player.stop();
            self.playback_generation += 1;
            self.guide_playing = false;
        }
    }

    fn try_start_playback(&mut self) -> Result<(), SessionError> {
        if !self.files.exists(&self.recording_file) {
            return Err(SessionError::FileMissing(
                self.recording_file.path().to_path_buf(),
            ));
        }

        self.player.stop();
        self.register_completion();
        let started = self
            .player
            .load(&self.recording_file)
            .and_then(|()| self.player.play());
        if let Err(e) = started {
            self.player.stop();
            return Err(SessionError::PlayerInitFailure(e.to_string()));
        }

        self.apply(SessionMachine::start_playing);
        self.view.set_play_label(PAUSE_LABEL);
        self.view.set_record_enabled(false);
        tracing::info!(file = %self.recording_file, "playback started");
        Ok(())
    }

    fn stop_playback(&mut self) {
        self.player.stop();
        self.playback_generation += 1;
        self.apply(SessionMachine::stop_playing);
        self.view.set_play_label(PLAY_LABEL);
        self.view.set_record_enabled(true);
        tracing::info!("playback stopped");
    }

    fn register_completion(&mut self) {
        self.playback_generation += 1;
        let generation = self.playback_generation;
        let events = self.events.clone();
        self.player.on_completion(Box::new(move || {
            events.send(SessionEvent::PlaybackFinished { generation });
        }));
    }

    fn request_permission(&mut self) {
        if self.permission_pending {
            return;
        }
        self.permission_pending = true;
        let events = self.events.clone();
        self.permission
            .request_microphone_permission(Box::new(move |granted| {
                events.send(SessionEvent::PermissionResolved { granted });
            }));
    }

    fn apply(&mut self, step: fn(&mut SessionMachine) -> Result<(), InvalidStateTransition>) {
        if let Err(err) = step(&mut self.machine) {
            tracing::warn!(%err, "state transition skipped");
        }
    }

    fn report(&self, err: SessionError) {
        tracing::warn!(kind = err.kind(), error = ?err, "session error");
        self.notifier.show_error(&err.alert());
    }
}
