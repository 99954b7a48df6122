//! Cross-platform microphone recorder using cpal
//!
//! The cpal stream is not Send, so it lives on a dedicated capture thread
//! for the whole recording. The cpal callback only appends to a shared
//! buffer; the capture thread drains that buffer into the streaming WAV
//! encoder every poll, so neither side holds more than a few milliseconds
//! of audio.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SizedSample, StreamConfig};

use super::wav_encoder::{CaptureFormat, WavStreamWriter};
use crate::application::ports::{FailureCallback, Recorder, RecordingError};
use crate::domain::recording::{FileRef, QualitySettings};

/// How often the capture thread drains captured audio into the file
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// State shared between the recorder and the cpal callbacks
#[derive(Clone, Default)]
struct CaptureShared {
    /// Interleaved samples at the device format, not yet encoded
    samples: Arc<StdMutex<Vec<f32>>>,
    /// Frames captured so far
    frames: Arc<AtomicU64>,
    /// Peak of the latest callback block, as `f32` bits
    level: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
    /// Set once the failure callback has fired for this recording
    failed: Arc<AtomicBool>,
    on_failure: Arc<StdMutex<Option<FailureCallback>>>,
}

impl CaptureShared {
    fn push<T: Copy>(&self, data: &[T], channels: u16, convert: fn(T) -> f32) {
        if !self.is_recording.load(Ordering::SeqCst) || channels == 0 {
            return;
        }

        let mut peak = 0.0f32;
        {
            let mut samples = lock(&self.samples);
            samples.extend(data.iter().map(|&s| {
                let sample = convert(s);
                peak = peak.max(sample.abs());
                sample
            }));
        }
        self.level.store(peak.min(1.0).to_bits(), Ordering::SeqCst);
        self.frames
            .fetch_add((data.len() / channels as usize) as u64, Ordering::SeqCst);
    }

    /// Take everything captured since the last drain
    fn drain(&self) -> Vec<f32> {
        std::mem::take(&mut *lock(&self.samples))
    }

    fn level(&self) -> f32 {
        f32::from_bits(self.level.load(Ordering::SeqCst))
    }

    fn reset(&self) {
        lock(&self.samples).clear();
        self.frames.store(0, Ordering::SeqCst);
        self.level.store(0.0f32.to_bits(), Ordering::SeqCst);
    }

    fn fail(&self, reason: String) {
        if !self.is_recording.load(Ordering::SeqCst) || self.failed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::error!(%reason, "audio input stream failed");
        if let Some(callback) = lock(&self.on_failure).as_ref() {
            callback(reason);
        }
    }
}

/// Where and how a recording gets written
struct CaptureTarget {
    file: FileRef,
    settings: QualitySettings,
}

/// What the capture thread hands back when it exits
type CaptureResult = Result<WavStreamWriter, RecordingError>;

/// A recording in progress
struct ActiveCapture {
    handle: JoinHandle<CaptureResult>,
    format: CaptureFormat,
}

/// Microphone recorder writing WAV files
pub struct CpalRecorder {
    shared: CaptureShared,
    active: StdMutex<Option<ActiveCapture>>,
}

impl CpalRecorder {
    /// Create a new cpal-based recorder
    pub fn new() -> Self {
        Self {
            shared: CaptureShared::default(),
            active: StdMutex::new(None),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Open the device, the output file and a running input stream
    fn open_stream(
        shared: &CaptureShared,
        target: &CaptureTarget,
    ) -> Result<(cpal::Stream, WavStreamWriter, CaptureFormat), RecordingError> {
        let device = Self::get_input_device()?;
        let supported = device
            .default_input_config()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get input config: {}", e)))?;

        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let format = CaptureFormat {
            sample_rate: config.sample_rate.0,
            channels: config.channels,
        };

        let writer = WavStreamWriter::create(&target.file, format, &target.settings)
            .map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        let stream = match sample_format {
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, shared, |s| s as f32 / 32768.0)
            }
            SampleFormat::U16 => Self::build_stream::<u16>(&device, &config, shared, |s| {
                (s as f32 - 32768.0) / 32768.0
            }),
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, shared, |s| s),
            other => Err(RecordingError::StartFailed(format!(
                "Unsupported sample format: {:?}",
                other
            ))),
        }
        .and_then(|stream| {
            stream
                .play()
                .map_err(|e| RecordingError::StartFailed(e.to_string()))?;
            Ok(stream)
        });

        match stream {
            Ok(stream) => Ok((stream, writer, format)),
            Err(e) => {
                writer.discard();
                Err(e)
            }
        }
    }

    fn build_stream<T: SizedSample + 'static>(
        device: &cpal::Device,
        config: &StreamConfig,
        shared: &CaptureShared,
        convert: fn(T) -> f32,
    ) -> Result<cpal::Stream, RecordingError> {
        let channels = config.channels;
        let data_shared = shared.clone();
        let error_shared = shared.clone();

        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    data_shared.push(data, channels, convert)
                },
                move |err| error_shared.fail(err.to_string()),
                None,
            )
            .map_err(|e| RecordingError::StartFailed(e.to_string()))
    }

    /// Capture thread body: open the stream and file, report readiness,
    /// then encode captured audio until recording stops.
    fn run_capture(
        shared: CaptureShared,
        target: CaptureTarget,
        ready: mpsc::Sender<Result<CaptureFormat, RecordingError>>,
    ) -> CaptureResult {
        let (stream, mut writer) = match Self::open_stream(&shared, &target) {
            Ok((stream, writer, format)) => {
                let _ = ready.send(Ok(format));
                (stream, writer)
            }
            Err(e) => {
                let _ = ready.send(Err(e.clone()));
                return Err(e);
            }
        };

        let mut write_error = None;
        while shared.is_recording.load(Ordering::SeqCst) {
            thread::sleep(POLL_INTERVAL);
            if let Err(e) = Self::encode_pending(&shared, &mut writer, &mut write_error) {
                shared.fail(e);
            }
        }

        drop(stream);
        tracing::debug!("input stream closed");

        let _ = Self::encode_pending(&shared, &mut writer, &mut write_error);
        match write_error {
            None => Ok(writer),
            Some(reason) => {
                writer.discard();
                Err(RecordingError::WriteFailed(reason))
            }
        }
    }

    /// Move captured audio into the file. After the first write error the
    /// audio is dropped and the error is kept for `stop`.
    fn encode_pending(
        shared: &CaptureShared,
        writer: &mut WavStreamWriter,
        write_error: &mut Option<String>,
    ) -> Result<(), String> {
        let block = shared.drain();
        if block.is_empty() || write_error.is_some() {
            return Ok(());
        }
        writer.write(&block).map_err(|e| {
            let reason = e.to_string();
            *write_error = Some(reason.clone());
            reason
        })
    }

    /// Stop the capture thread and take its encoder
    fn halt(&self) -> Option<CaptureResult> {
        let active = lock(&self.active).take();
        self.shared.is_recording.store(false, Ordering::SeqCst);

        let ActiveCapture { handle, .. } = active?;
        Some(handle.join().unwrap_or_else(|_| {
            tracing::warn!("capture thread panicked");
            Err(RecordingError::RecordingFailed(
                "Capture thread panicked".to_string(),
            ))
        }))
    }
}

impl Default for CpalRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder for CpalRecorder {
    fn start(&self, file: &FileRef, settings: &QualitySettings) -> Result<(), RecordingError> {
        let mut active = lock(&self.active);
        if active.is_some() {
            return Err(RecordingError::StartFailed(
                "Recording already in progress".to_string(),
            ));
        }

        self.shared.reset();
        self.shared.failed.store(false, Ordering::SeqCst);
        self.shared.is_recording.store(true, Ordering::SeqCst);

        let (ready_tx, ready_rx) = mpsc::channel();
        let shared = self.shared.clone();
        let target = CaptureTarget {
            file: file.clone(),
            settings: *settings,
        };
        let handle = thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || CpalRecorder::run_capture(shared, target, ready_tx))
            .map_err(|e| {
                self.shared.is_recording.store(false, Ordering::SeqCst);
                RecordingError::StartFailed(e.to_string())
            })?;

        // The capture thread always answers, or drops the sender by panicking
        let format = match ready_rx.recv() {
            Ok(Ok(format)) => format,
            Ok(Err(e)) => {
                self.shared.is_recording.store(false, Ordering::SeqCst);
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => {
                self.shared.is_recording.store(false, Ordering::SeqCst);
                let _ = handle.join();
                return Err(RecordingError::StartFailed(
                    "Capture thread exited before opening the device".into(),
                ));
            }
        };

        tracing::debug!(
            sample_rate = format.sample_rate,
            channels = format.channels,
            file = %file,
            "capture started"
        );

        *active = Some(ActiveCapture { handle, format });
        Ok(())
    }

    fn stop(&self) -> Result<(), RecordingError> {
        let writer = self.halt().ok_or(RecordingError::NotRecording)??;

        if self.shared.frames.load(Ordering::SeqCst) == 0 {
            writer.discard();
            return Err(RecordingError::RecordingFailed(
                "No audio data captured".to_string(),
            ));
        }

        writer
            .finish()
            .map_err(|e| RecordingError::WriteFailed(e.to_string()))?;

        tracing::debug!("recording finalized");
        Ok(())
    }

    fn cancel(&self) {
        match self.halt() {
            Some(Ok(writer)) => {
                writer.discard();
                tracing::debug!("recording discarded");
            }
            Some(Err(e)) => tracing::debug!(error = %e, "recording discarded after failure"),
            None => {}
        }
        self.shared.reset();
    }

    fn is_recording(&self) -> bool {
        self.shared.is_recording.load(Ordering::SeqCst)
    }

    fn current_elapsed_seconds(&self) -> f64 {
        let rate = lock(&self.active)
            .as_ref()
            .map(|capture| capture.format.sample_rate)
            .unwrap_or(0);
        if rate == 0 {
            return 0.0;
        }
        self.shared.frames.load(Ordering::SeqCst) as f64 / rate as f64
    }

    fn current_level(&self) -> f32 {
        if !self.is_recording() {
            return 0.0;
        }
        self.shared.level()
    }

    fn on_failure(&self, callback: FailureCallback) {
        *lock(&self.shared.on_failure) = Some(callback);
    }
}
