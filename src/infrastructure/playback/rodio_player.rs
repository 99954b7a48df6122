//! Rodio-based audio file player
//!
//! rodio's `OutputStream` is not Send, so each playback runs on its own
//! thread that owns the stream and the sink until the file ends or `stop`
//! is called.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{CompletionCallback, PlaybackError, Player};
use crate::domain::recording::FileRef;

/// How often the playback thread checks for end of file or stop
const POLL_INTERVAL: Duration = Duration::from_millis(20);

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open and decode an audio file
fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, PlaybackError> {
    let file = File::open(path).map_err(|e| PlaybackError::OpenFailed(e.to_string()))?;
    Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::DecodeFailed(e.to_string()))
}

/// A playback in progress
struct ActivePlayback {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

/// Audio file player using rodio
pub struct RodioPlayer {
    loaded: StdMutex<Option<PathBuf>>,
    active: StdMutex<Option<ActivePlayback>>,
    is_playing: Arc<AtomicBool>,
    on_completion: Arc<StdMutex<Option<CompletionCallback>>>,
}

impl RodioPlayer {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self {
            loaded: StdMutex::new(None),
            active: StdMutex::new(None),
            is_playing: Arc::new(AtomicBool::new(false)),
            on_completion: Arc::new(StdMutex::new(None)),
        }
    }

    /// Playback thread body
    fn run_playback(
        path: PathBuf,
        stop: Arc<AtomicBool>,
        is_playing: Arc<AtomicBool>,
        on_completion: Arc<StdMutex<Option<CompletionCallback>>>,
        ready: mpsc::Sender<Result<(), PlaybackError>>,
    ) {
        let opened = OutputStream::try_default()
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))
            .and_then(|(stream, handle)| {
                let sink = Sink::try_new(&handle)
                    .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;
                sink.append(open_decoder(&path)?);
                Ok((stream, sink))
            });

        let (_stream, sink) = match opened {
            Ok(output) => {
                let _ = ready.send(Ok(()));
                output
            }
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        loop {
            if stop.load(Ordering::SeqCst) {
                sink.stop();
                return;
            }
            if sink.empty() {
                break;
            }
            thread::sleep(POLL_INTERVAL);
        }

        is_playing.store(false, Ordering::SeqCst);
        tracing::debug!(file = %path.display(), "playback reached end");
        if let Some(callback) = lock(&on_completion).as_ref() {
            callback();
        }
    }

    /// Stop the playback thread, if any, and wait for it to release the device
    fn halt(&self) {
        let active = lock(&self.active).take();
        if let Some(playback) = active {
            playback.stop.store(true, Ordering::SeqCst);
            if playback.handle.join().is_err() {
                tracing::warn!("playback thread panicked");
            }
        }
        self.is_playing.store(false, Ordering::SeqCst);
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player for RodioPlayer {
    fn load(&self, file: &FileRef) -> Result<(), PlaybackError> {
        self.halt();
        *lock(&self.loaded) = None;

        // Decode up front so a bad file fails here rather than mid-playback
        open_decoder(file.path())?;
        *lock(&self.loaded) = Some(file.path().to_path_buf());
        tracing::debug!(%file, "audio file loaded");
        Ok(())
    }

    fn play(&self) -> Result<(), PlaybackError> {
        self.halt();
        let path = lock(&self.loaded)
            .clone()
            .ok_or(PlaybackError::NothingLoaded)?;

        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();
        self.is_playing.store(true, Ordering::SeqCst);

        let handle = {
            let stop = Arc::clone(&stop);
            let is_playing = Arc::clone(&self.is_playing);
            let on_completion = Arc::clone(&self.on_completion);
            thread::Builder::new()
                .name("audio-playback".to_string())
                .spawn(move || {
                    RodioPlayer::run_playback(path, stop, is_playing, on_completion, ready_tx)
                })
                .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))
        };
        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => {
                self.is_playing.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let started = ready_rx.recv().unwrap_or_else(|_| {
            Err(PlaybackError::DeviceNotAvailable(
                "Playback thread exited before opening the output".into(),
            ))
        });

        *lock(&self.active) = Some(ActivePlayback { handle, stop });
        if let Err(e) = started {
            self.halt();
            return Err(e);
        }
        Ok(())
    }

    fn stop(&self) {
        self.halt();
    }

    fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }

    fn on_completion(&self, callback: CompletionCallback) {
        *lock(&self.on_completion) = Some(callback);
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        self.halt();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn write_tone(path: &Path, seconds: f32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for _ in 0..(8000.0 * seconds) as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn player_default_state() {
        let player = RodioPlayer::new();
        assert!(!player.is_playing());
    }

    #[test]
    fn play_without_load_fails() {
        let player = RodioPlayer::new();
        assert!(matches!(player.play(), Err(PlaybackError::NothingLoaded)));
        assert!(!player.is_playing());
    }

    #[test]
    fn load_missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let player = RodioPlayer::new();
        let result = player.load(&FileRef::new(dir.path().join("absent.wav")));
        assert!(matches!(result, Err(PlaybackError::OpenFailed(_))));
    }

    #[test]
    fn load_garbage_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let player = RodioPlayer::new();
        let result = player.load(&FileRef::new(path));
        assert!(matches!(result, Err(PlaybackError::DecodeFailed(_))));
    }

    #[test]
    fn load_valid_wav_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 0.1);

        let player = RodioPlayer::new();
        assert!(player.load(&FileRef::new(path)).is_ok());
        assert!(!player.is_playing());
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn natural_end_invokes_completion_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 0.2);

        let player = RodioPlayer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        player.on_completion(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        player.load(&FileRef::new(path)).unwrap();
        player.play().unwrap();
        thread::sleep(Duration::from_millis(800));

        assert!(!player.is_playing());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn stop_suppresses_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_tone(&path, 2.0);

        let player = RodioPlayer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        player.on_completion(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        player.load(&FileRef::new(path)).unwrap();
        player.play().unwrap();
        player.stop();

        assert!(!player.is_playing());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
