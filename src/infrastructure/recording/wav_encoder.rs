//! Streaming WAV encoder for recordings
//!
//! Captured audio arrives in blocks of interleaved f32 at whatever rate and
//! channel count the input device runs at. Each block is remixed to the
//! requested channel count, resampled to the requested rate, and quantized
//! to the bit depth of the requested quality as it arrives, so memory use
//! does not grow with the length of the take.
//!
//! The file is written next to its target as `<name>.part` and renamed over
//! the target once finalized, so a failed or discarded recording never
//! clobbers the previous one.

use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};

use hound::{SampleFormat, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};

use crate::domain::recording::{FileRef, QualitySettings};

/// Rate and channel count of captured audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Resampler chunk size in frames
const CHUNK_SIZE: usize = 1024;

/// WAV encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("Resampler init failed: {0}")]
    ResamplerInit(String),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("WAV write failed: {0}")]
    Write(String),

    #[error("Failed to move recording into place: {0}")]
    Rename(String),
}

/// Encoder for one recording, fed block by block.
///
/// Dropping it without [`finish`](Self::finish) or
/// [`discard`](Self::discard) leaves the `.part` file behind.
pub struct WavStreamWriter {
    target: FileRef,
    writer: WavWriter<BufWriter<File>>,
    source_channels: u16,
    channels: u16,
    bits: u16,
    resampler: Option<StreamResampler>,
}

impl WavStreamWriter {
    /// Open `<target>.part` for a recording captured in `source` format
    pub fn create(
        target: &FileRef,
        source: CaptureFormat,
        settings: &QualitySettings,
    ) -> Result<Self, EncodingError> {
        let channels = settings.channels.max(1);
        let sample_rate = settings.sample_rate.max(1);
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: settings.bits_per_sample(),
            sample_format: SampleFormat::Int,
        };

        let resampler = if source.sample_rate == 0 || source.sample_rate == sample_rate {
            None
        } else {
            Some(StreamResampler::new(source.sample_rate, sample_rate, channels)?)
        };

        if let Some(parent) = target.path().parent() {
            fs::create_dir_all(parent).map_err(|e| EncodingError::Write(e.to_string()))?;
        }
        let writer = WavWriter::create(target.partial_path(), spec)
            .map_err(|e| EncodingError::Write(e.to_string()))?;

        Ok(Self {
            target: target.clone(),
            writer,
            source_channels: source.channels.max(1),
            channels,
            bits: spec.bits_per_sample,
            resampler,
        })
    }

    /// Encode one block of interleaved samples in the capture format
    pub fn write(&mut self, samples: &[f32]) -> Result<(), EncodingError> {
        let remixed = remix(samples, self.source_channels, self.channels);
        match self.resampler.as_mut() {
            Some(resampler) => {
                let resampled = resampler.process(&remixed)?;
                write_samples(&mut self.writer, &resampled, self.bits)
            }
            None => write_samples(&mut self.writer, &remixed, self.bits),
        }
    }

    /// Flush the resampler, finalize the header and move the file into place
    pub fn finish(self) -> Result<(), EncodingError> {
        let Self {
            target,
            writer,
            bits,
            resampler,
            ..
        } = self;
        let partial = target.partial_path();

        if let Err(e) = finalize(writer, resampler, bits) {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }

        fs::rename(&partial, target.path()).map_err(|e| {
            let _ = fs::remove_file(&partial);
            EncodingError::Rename(e.to_string())
        })
    }

    /// Close and delete the `.part` file; the target is left untouched
    pub fn discard(self) {
        let Self { target, writer, .. } = self;
        drop(writer);
        if let Err(e) = fs::remove_file(target.partial_path()) {
            tracing::debug!(error = %e, "no partial recording to remove");
        }
    }
}

fn finalize(
    mut writer: WavWriter<BufWriter<File>>,
    resampler: Option<StreamResampler>,
    bits: u16,
) -> Result<(), EncodingError> {
    if let Some(resampler) = resampler {
        let tail = resampler.flush()?;
        write_samples(&mut writer, &tail, bits)?;
    }
    writer
        .finalize()
        .map_err(|e| EncodingError::Write(e.to_string()))
}

fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f32],
    bits: u16,
) -> Result<(), EncodingError> {
    for &sample in samples {
        writer
            .write_sample(quantize(sample, bits))
            .map_err(|e| EncodingError::Write(e.to_string()))?;
    }
    Ok(())
}

/// Scale a [-1, 1] sample to a signed integer of `bits` width
fn quantize(sample: f32, bits: u16) -> i32 {
    let max = ((1i64 << (bits - 1)) - 1) as f32;
    (sample.clamp(-1.0, 1.0) * max).round() as i32
}

/// Convert interleaved audio between channel counts.
///
/// Down to mono averages every frame; any other change maps output channel
/// `c` to input channel `min(c, from - 1)`.
fn remix(samples: &[f32], from: u16, to: u16) -> Vec<f32> {
    if from == to {
        return samples.to_vec();
    }

    let from = from as usize;
    let to = to as usize;
    let mut output = Vec::with_capacity(samples.len() / from * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            output.push(frame.iter().sum::<f32>() / from as f32);
        } else {
            output.extend((0..to).map(|c| frame[c.min(from - 1)]));
        }
    }

    output
}

/// Chunked rate conversion that keeps its state across blocks.
///
/// Input is buffered per channel until a full resampler chunk is available.
/// The resampler's output delay is dropped from the front, and `flush`
/// pads with silence until the output length matches the input length
/// times the rate ratio.
struct StreamResampler {
    resampler: FftFixedIn<f32>,
    pending: Vec<Vec<f32>>,
    /// Output frames still to drop for the resampler delay
    skip: usize,
    ratio: f64,
    frames_in: u64,
    frames_out: u64,
}

impl StreamResampler {
    fn new(from_rate: u32, to_rate: u32, channels: u16) -> Result<Self, EncodingError> {
        let channels = channels.max(1) as usize;
        let resampler = FftFixedIn::<f32>::new(
            from_rate as usize,
            to_rate as usize,
            CHUNK_SIZE,
            2,
            channels,
        )
        .map_err(|e| EncodingError::ResamplerInit(e.to_string()))?;

        Ok(Self {
            skip: resampler.output_delay(),
            resampler,
            pending: vec![Vec::with_capacity(CHUNK_SIZE * 2); channels],
            ratio: to_rate as f64 / from_rate as f64,
            frames_in: 0,
            frames_out: 0,
        })
    }

    /// Queue interleaved input; returns whatever full chunks produced
    fn process(&mut self, interleaved: &[f32]) -> Result<Vec<f32>, EncodingError> {
        let channels = self.pending.len();
        for (i, &sample) in interleaved.iter().enumerate() {
            self.pending[i % channels].push(sample);
        }
        self.frames_in += (interleaved.len() / channels) as u64;

        let mut output = Vec::new();
        while self.pending[0].len() >= self.resampler.input_frames_next() {
            let needed = self.resampler.input_frames_next();
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|channel| channel.drain(..needed).collect())
                .collect();
            self.run(&chunk, &mut output, None)?;
        }
        Ok(output)
    }

    /// Push the buffered remainder and the delay line out
    fn flush(mut self) -> Result<Vec<f32>, EncodingError> {
        let expected = (self.frames_in as f64 * self.ratio).ceil() as u64;
        let mut output = Vec::new();

        while self.frames_out < expected {
            let needed = self.resampler.input_frames_next();
            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|channel| {
                    let mut block: Vec<f32> = channel.drain(..).collect();
                    block.resize(needed, 0.0);
                    block
                })
                .collect();
            self.run(&chunk, &mut output, Some(expected))?;
        }
        Ok(output)
    }

    fn run(
        &mut self,
        chunk: &[Vec<f32>],
        output: &mut Vec<f32>,
        limit: Option<u64>,
    ) -> Result<(), EncodingError> {
        let resampled = self
            .resampler
            .process(chunk, None)
            .map_err(|e| EncodingError::Resample(e.to_string()))?;

        let frames = resampled.first().map_or(0, Vec::len);
        for frame in 0..frames {
            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }
            if limit.is_some_and(|limit| self.frames_out >= limit) {
                break;
            }
            output.extend(resampled.iter().map(|channel| channel[frame]));
            self.frames_out += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recording::EncoderQuality;

    fn settings(sample_rate: u32, channels: u16, quality: EncoderQuality) -> QualitySettings {
        QualitySettings {
            sample_rate,
            channels,
            quality,
        }
    }

    fn format(sample_rate: u32, channels: u16) -> CaptureFormat {
        CaptureFormat {
            sample_rate,
            channels,
        }
    }

    #[test]
    fn remix_stereo_to_mono_averages() {
        let stereo = vec![0.2, 0.4, -0.5, 0.5];
        assert_eq!(remix(&stereo, 2, 1), vec![0.3, 0.0]);
    }

    #[test]
    fn remix_mono_to_stereo_duplicates() {
        let mono = vec![0.1, -0.2];
        assert_eq!(remix(&mono, 1, 2), vec![0.1, 0.1, -0.2, -0.2]);
    }

    #[test]
    fn quantize_uses_full_range() {
        assert_eq!(quantize(1.0, 16), i16::MAX as i32);
        assert_eq!(quantize(-1.0, 16), -(i16::MAX as i32));
        assert_eq!(quantize(2.0, 8), 127);
        assert_eq!(quantize(0.0, 24), 0);
    }

    #[test]
    fn resampler_output_matches_ratio_across_uneven_blocks() {
        let mut resampler = StreamResampler::new(48000, 44100, 2).unwrap();
        let mut output = Vec::new();
        // 48000 frames in blocks that never line up with the chunk size
        for _ in 0..100 {
            output.extend(resampler.process(&vec![0.0f32; 480 * 2]).unwrap());
        }
        output.extend(resampler.flush().unwrap());
        assert_eq!(output.len(), 44100 * 2);
    }

    #[test]
    fn streamed_blocks_produce_full_duration() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileRef::new(dir.path().join("take.wav"));
        let mut writer =
            WavStreamWriter::create(&target, format(48000, 2), &QualitySettings::default())
                .unwrap();

        // Two seconds at 48 kHz in 10 ms callback-sized blocks
        for _ in 0..200 {
            writer.write(&vec![0.25f32; 480 * 2]).unwrap();
        }
        assert!(target.partial_path().exists());
        assert!(!target.path().exists());

        writer.finish().unwrap();

        assert!(target.path().exists());
        assert!(!target.partial_path().exists());
        let reader = hound::WavReader::open(target.path()).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.bits_per_sample, 24);
        assert_eq!(reader.duration(), 44100 * 2);
    }

    #[test]
    fn applies_requested_channels_and_depth() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileRef::new(dir.path().join("nested").join("take.wav"));
        let mut writer = WavStreamWriter::create(
            &target,
            format(22050, 2),
            &settings(22050, 1, EncoderQuality::Medium),
        )
        .unwrap();

        writer.write(&vec![0.0f32; 11025 * 2]).unwrap();
        writer.write(&vec![0.0f32; 11025 * 2]).unwrap();
        writer.finish().unwrap();

        let reader = hound::WavReader::open(target.path()).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.duration(), 22050);
    }

    #[test]
    fn finishing_overwrites_previous_take() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileRef::new(dir.path().join("take.wav"));
        let quality = settings(8000, 1, EncoderQuality::Low);

        let mut first = WavStreamWriter::create(&target, format(8000, 1), &quality).unwrap();
        first.write(&vec![0.0; 8000]).unwrap();
        first.finish().unwrap();

        let mut second = WavStreamWriter::create(&target, format(8000, 1), &quality).unwrap();
        second.write(&vec![0.0; 4000]).unwrap();
        second.finish().unwrap();

        let reader = hound::WavReader::open(target.path()).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 8);
        assert_eq!(reader.duration(), 4000);
    }

    #[test]
    fn discard_keeps_previous_take() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileRef::new(dir.path().join("take.wav"));
        let quality = settings(8000, 1, EncoderQuality::Low);

        let mut kept = WavStreamWriter::create(&target, format(8000, 1), &quality).unwrap();
        kept.write(&vec![0.0; 8000]).unwrap();
        kept.finish().unwrap();

        let mut aborted = WavStreamWriter::create(&target, format(8000, 1), &quality).unwrap();
        aborted.write(&vec![0.0; 100]).unwrap();
        aborted.discard();

        assert!(!target.partial_path().exists());
        let reader = hound::WavReader::open(target.path()).unwrap();
        assert_eq!(reader.duration(), 8000);
    }

    #[test]
    fn written_samples_read_back_scaled() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileRef::new(dir.path().join("scaled.wav"));
        let mut writer = WavStreamWriter::create(
            &target,
            format(8000, 1),
            &settings(8000, 1, EncoderQuality::Medium),
        )
        .unwrap();

        writer.write(&[0.5, -0.5, 0.0]).unwrap();
        writer.finish().unwrap();

        let mut reader = hound::WavReader::open(target.path()).unwrap();
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, vec![16384, -16384, 0]);
    }
}
