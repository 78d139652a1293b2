//! Audio decode/encode module
//!
//! Uploaded recordings arrive as raw bytes in an arbitrary container format.
//! Decoding normalizes everything to mono f32 samples; encoding always
//! produces 16-bit PCM WAV so downstream consumers (diarization provider,
//! voice-cloning model) see a single canonical format.

use std::io::Cursor;

use hound::{WavReader, WavSpec, WavWriter};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

/// Audio processing errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV processing error: {0}")]
    Hound(#[from] hound::Error),

    #[error("Resampling error: {0}")]
    Resample(String),

    #[error("Decoding error: {0}")]
    Decode(String),
}

/// Decoded audio samples (mono, f32)
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    /// Sample data
    pub samples: Vec<f32>,
    /// Sample rate
    pub sample_rate: u32,
}

impl AudioBuffer {
    /// Create an empty buffer carrying the given encoding parameters
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Get the duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64 * 1000.0
    }

    /// Get the sample index for a millisecond offset
    pub fn ms_to_sample(&self, ms: f64) -> usize {
        (ms / 1000.0 * self.sample_rate as f64) as usize
    }
}

/// Audio decoder/encoder
pub struct AudioProcessor {
    /// Resample decoded audio to this rate (None keeps the source rate)
    target_sample_rate: Option<u32>,
}

impl AudioProcessor {
    /// Create a new audio processor
    pub fn new(target_sample_rate: Option<u32>) -> Self {
        Self { target_sample_rate }
    }

    /// Decode an in-memory recording into mono f32 samples
    ///
    /// WAV payloads take the hound fast path; everything else goes through
    /// symphonia's format probe.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
        if bytes.len() >= 4 && &bytes[..4] == b"RIFF" {
            self.decode_wav(bytes)
        } else {
            self.decode_symphonia(bytes)
        }
    }

    /// Decode a WAV payload
    fn decode_wav(&self, bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max_val))
                    .collect::<Result<Vec<_>, _>>()?
            }
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        };

        let mono_samples = Self::downmix(samples, spec.channels as usize);

        let final_samples = match self.target_sample_rate {
            Some(target) if target != spec.sample_rate => {
                self.resample(&mono_samples, spec.sample_rate, target)?
            }
            _ => mono_samples,
        };

        Ok(AudioBuffer {
            samples: final_samples,
            sample_rate: self.target_sample_rate.unwrap_or(spec.sample_rate),
        })
    }

    /// Decode any other container via symphonia
    fn decode_symphonia(&self, bytes: &[u8]) -> Result<AudioBuffer, AudioError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::UnsupportedFormat(format!("probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::Decode("no audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::Decode("missing sample rate".to_string()))?;

        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(2);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Decode(format!("failed to create decoder: {}", e)))?;

        let mut all_samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    tracing::warn!("decode warning: {}", e);
                    continue;
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("packet decode error: {}", e);
                    continue;
                }
            };

            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;

            let mut sample_buf = SampleBuffer::<f32>::new(duration, spec);
            sample_buf.copy_interleaved_ref(decoded);

            all_samples.extend(Self::downmix(sample_buf.samples().to_vec(), channels));
        }

        let final_samples = match self.target_sample_rate {
            Some(target) if target != sample_rate => {
                self.resample(&all_samples, sample_rate, target)?
            }
            _ => all_samples,
        };

        Ok(AudioBuffer {
            samples: final_samples,
            sample_rate: self.target_sample_rate.unwrap_or(sample_rate),
        })
    }

    /// Average interleaved channels down to mono
    fn downmix(samples: Vec<f32>, channels: usize) -> Vec<f32> {
        if channels <= 1 {
            return samples;
        }
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
            .collect()
    }

    /// Resample mono samples between rates
    fn resample(
        &self,
        samples: &[f32],
        from_rate: u32,
        to_rate: u32,
    ) -> Result<Vec<f32>, AudioError> {
        use rubato::{FftFixedInOut, Resampler};

        let ratio = to_rate as f64 / from_rate as f64;
        let chunk_size = 1024;

        let mut resampler =
            FftFixedInOut::<f32>::new(from_rate as usize, to_rate as usize, chunk_size, 1)
                .map_err(|e| AudioError::Resample(e.to_string()))?;

        let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize);

        for chunk in samples.chunks(chunk_size) {
            if chunk.len() == chunk_size {
                let input = vec![chunk.to_vec()];
                let result = resampler
                    .process(&input, None)
                    .map_err(|e| AudioError::Resample(e.to_string()))?;
                output.extend_from_slice(&result[0]);
            }
        }

        // Pad the tail chunk and trim the resampled remainder to length
        let remaining = samples.len() % chunk_size;
        if remaining > 0 {
            let mut padded = samples[samples.len() - remaining..].to_vec();
            padded.resize(chunk_size, 0.0);
            let input = vec![padded];
            let result = resampler
                .process(&input, None)
                .map_err(|e| AudioError::Resample(e.to_string()))?;
            let output_remaining = (remaining as f64 * ratio) as usize;
            output.extend_from_slice(&result[0][..output_remaining.min(result[0].len())]);
        }

        Ok(output)
    }

    /// Encode a buffer as 16-bit PCM mono WAV bytes
    pub fn encode_wav(&self, audio: &AudioBuffer) -> Result<Vec<u8>, AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec)?;
            let max_val = (1i32 << 15) as f32;
            for &sample in &audio.samples {
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i16;
                writer.write_sample(int_sample)?;
            }
            writer.finalize()?;
        }

        Ok(cursor.into_inner())
    }
}

impl Default for AudioProcessor {
    fn default() -> Self {
        Self::new(None)
    }
}
