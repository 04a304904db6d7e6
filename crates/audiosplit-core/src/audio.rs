//! WAV codec boundary and numeric mixing.
//!
//! Everything past this module works on [`Waveform`]s: interleaved f32
//! samples plus rate/channel metadata. Encoding always writes 32-bit float
//! WAV so that a mix whose peaks exceed 1.0 is carried through losslessly
//! instead of being clipped; the policy is "combine as-is", with a logged
//! warning when the mixed peak goes above full scale.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tracing::warn;

use crate::error::AudioError;

/// A decoded audio signal: interleaved samples, frame = `channels` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved f32 samples, nominal range [-1.0, 1.0].
    pub samples: Vec<f32>,
}

impl Waveform {
    /// Number of frames (samples per channel).
    pub fn duration_frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Decode a WAV container into a [`Waveform`].
///
/// Supports 16/24/32-bit integer PCM and 32-bit float.
pub fn decode_wav(bytes: &[u8]) -> Result<Waveform, AudioError> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ (16 | 24 | 32)) => {
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (format, bits) => {
            return Err(AudioError::UnsupportedFormat {
                bits,
                format: match format {
                    SampleFormat::Float => "float",
                    SampleFormat::Int => "int",
                },
            });
        }
    };

    Ok(Waveform {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

/// Encode a [`Waveform`] as a 32-bit float WAV container.
pub fn encode_wav(waveform: &Waveform) -> Result<Vec<u8>, AudioError> {
    let spec = WavSpec {
        channels: waveform.channels,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec)?;
    for &s in &waveform.samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

/// Check that every signal agrees on sample rate and channel layout with
/// the first one. The caller decides which error category a mismatch maps
/// onto (incompatible user inputs vs. inconsistent engine outputs).
pub fn ensure_compatible(signals: &[Waveform]) -> Result<(), AudioError> {
    let first = signals.first().ok_or(AudioError::NoSignals)?;
    for s in &signals[1..] {
        if s.sample_rate != first.sample_rate {
            return Err(AudioError::SampleRateMismatch {
                expected: first.sample_rate,
                got: s.sample_rate,
            });
        }
        if s.channels != first.channels {
            return Err(AudioError::ChannelMismatch {
                expected: first.channels,
                got: s.channels,
            });
        }
    }
    Ok(())
}

/// Sum N compatible signals sample-by-sample into one.
///
/// Shorter signals are zero-padded to the longest. No gain normalization
/// and no clipping is applied; a peak above 1.0 is allowed (float output)
/// and logged.
pub fn mix(signals: &[Waveform]) -> Result<Waveform, AudioError> {
    ensure_compatible(signals)?;
    let first = &signals[0];

    let len = signals.iter().map(|s| s.samples.len()).max().unwrap_or(0);
    let mut out = vec![0.0f32; len];
    for s in signals {
        for (acc, &v) in out.iter_mut().zip(s.samples.iter()) {
            *acc += v;
        }
    }

    let mixed = Waveform {
        sample_rate: first.sample_rate,
        channels: first.channels,
        samples: out,
    };
    let peak = mixed.peak();
    if peak > 1.0 {
        warn!(peak, "mixed signal exceeds full scale; kept unclipped in float output");
    }
    Ok(mixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn wave(rate: u32, channels: u16, samples: &[f32]) -> Waveform {
        Waveform {
            sample_rate: rate,
            channels,
            samples: samples.to_vec(),
        }
    }

    #[test]
    fn float_wav_round_trips_exactly() {
        let w = wave(44_100, 2, &[0.0, 0.5, -0.5, 1.0, -1.0, 0.25]);
        let bytes = encode_wav(&w).expect("encode");
        let back = decode_wav(&bytes).expect("decode");
        assert_eq!(back, w);
    }

    #[test]
    fn int16_wav_decodes_with_scaling() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).expect("writer");
        for v in [0i16, i16::MAX, i16::MIN] {
            writer.write_sample(v).expect("sample");
        }
        writer.finalize().expect("finalize");

        let w = decode_wav(&cursor.into_inner()).expect("decode");
        assert_eq!(w.sample_rate, 8_000);
        assert_eq!(w.channels, 1);
        assert_eq!(w.samples[0], 0.0);
        assert!((w.samples[1] - (i16::MAX as f32 / 32_768.0)).abs() < 1e-6);
        assert!((w.samples[2] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mix_sums_without_normalization() {
        let a = wave(44_100, 1, &[0.5, 0.5, 0.5]);
        let b = wave(44_100, 1, &[0.75, 0.25, 0.75]);
        let mixed = mix(&[a, b]).expect("mix");
        // 0.5 + 0.75 = 1.25: above full scale, and deliberately kept.
        assert_eq!(mixed.samples, vec![1.25, 0.75, 1.25]);
    }

    #[test]
    fn mix_zero_pads_shorter_signals() {
        let a = wave(44_100, 1, &[1.0, 1.0, 1.0, 1.0]);
        let b = wave(44_100, 1, &[1.0]);
        let mixed = mix(&[a, b]).expect("mix");
        assert_eq!(mixed.samples, vec![2.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn mix_rejects_rate_mismatch() {
        let a = wave(44_100, 2, &[0.0; 4]);
        let b = wave(48_000, 2, &[0.0; 4]);
        assert!(matches!(
            mix(&[a, b]),
            Err(AudioError::SampleRateMismatch { .. })
        ));
    }

    #[test]
    fn mix_rejects_channel_mismatch() {
        let a = wave(44_100, 2, &[0.0; 4]);
        let b = wave(44_100, 1, &[0.0; 4]);
        assert!(matches!(mix(&[a, b]), Err(AudioError::ChannelMismatch { .. })));
    }

    #[test]
    fn mix_of_nothing_is_an_error() {
        assert!(matches!(mix(&[]), Err(AudioError::NoSignals)));
    }
}
