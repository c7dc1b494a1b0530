//! Background audio playback.
//!
//! A glicol procedural composition rendered through cpal. The audio is
//! accompaniment only; it never feeds back into the wave animation.

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;

use crate::params::{audio_constants::BLOCK_SIZE, AudioParams, RecordingConfig};

/// Glicol composition (procedural music code)
const COMPOSITION: &str = r#"
~gate: speed 1.0 >> seq 48 _ _55 48 _ 52 _ _
~amp: ~gate >> envperc 0.002 0.35
~pit: ~gate >> mul 130.81
~bed: saw ~pit >> mul ~amp >> lpf ~drift 4.0 >> mul 0.12
~drift: sin 0.13 >> mul 1100 >> add 1400
o: ~bed >> plate 0.12
"#;

/// Audio system managing the synthesis stream
pub struct AudioSystem {
    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Create and start the audio system.
    ///
    /// The glicol engine runs at the output device's default sample rate.
    /// When a `RecordingConfig` is present, the post-gain stereo samples are
    /// also written to `<output_dir>/audio.wav`.
    pub fn new(params: AudioParams, recording: Option<RecordingConfig>) -> anyhow::Result<Self> {
        params.validate().map_err(anyhow::Error::msg)?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device"))?;

        let config = device
            .default_output_config()
            .context("query default output config")?;
        let sample_rate = config.sample_rate().0;

        log::info!(
            "audio: {} @ {}Hz",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            sample_rate
        );

        // Create WAV writer if recording
        let mut wav_writer = recording
            .as_ref()
            .map(|recording| {
                let spec = hound::WavSpec {
                    channels: 2,
                    sample_rate,
                    bits_per_sample: 32,
                    sample_format: hound::SampleFormat::Float,
                };
                hound::WavWriter::create(recording.audio_path(), spec)
                    .context("create WAV writer")
            })
            .transpose()?;

        // Create glicol engine at the device rate
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate as usize);
        engine.update_with_code(COMPOSITION);
        engine
            .update()
            .map_err(|e| anyhow!("glicol engine init failed: {:?}", e))?;

        let gain = params.master_gain;
        let ceiling = params.limiter_ceiling;

        // Build audio output stream. The callback owns the engine and the
        // WAV writer; the writer finalizes when the stream drops.
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames_needed = data.len() / 2; // Stereo frames
                    let mut frame_idx = 0;

                    // Generate blocks until the entire buffer is filled
                    while frame_idx < frames_needed {
                        let (buffers, _) = engine.next_block(vec![]);

                        let frames = (frames_needed - frame_idx).min(BLOCK_SIZE);

                        for i in 0..frames {
                            let left = scale(buffers[0][i], gain, ceiling);
                            let right = scale(buffers[1][i], gain, ceiling);

                            let out_idx = (frame_idx + i) * 2;
                            data[out_idx] = left;
                            data[out_idx + 1] = right;

                            if let Some(writer) = wav_writer.as_mut() {
                                let _ = writer.write_sample(left);
                                let _ = writer.write_sample(right);
                            }
                        }

                        frame_idx += frames;
                    }
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .context("build audio stream")?;

        stream.play().context("start audio stream")?;

        Ok(Self { _stream: stream })
    }
}

/// Apply master gain, then hard-clip at the limiter ceiling
fn scale(sample: f32, gain: f32, ceiling: f32) -> f32 {
    (sample * gain).clamp(-ceiling, ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_gain_scaling() {
        assert!((scale(1.0, 0.05, 0.5) - 0.05).abs() < 1e-6);
        assert!((scale(-1.0, 0.05, 0.5) + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_limiter_hard_clip() {
        assert_eq!(scale(100.0, 1.0, 0.5), 0.5);
        assert_eq!(scale(-100.0, 1.0, 0.5), -0.5);
    }

    #[test]
    fn test_quiet_signal_passes_through() {
        let sample = 0.3;
        assert_eq!(scale(sample, 1.0, 0.5), sample);
    }
}
