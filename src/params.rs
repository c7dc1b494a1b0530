//! Parameter definitions with documented units and semantics.
//!
//! All magic numbers from the animation are extracted here with:
//! - Units (pixels, frames, cycles per image width)
//! - Documented ranges and meanings
//! - Validation where a bad value would produce nonsense geometry

/// Wave animation parameters
#[derive(Debug, Clone)]
pub struct WaveParams {
    /// Number of horizontal bands the image is divided into
    /// default: 60
    pub divisions: u32,

    /// Animation clock increment per rendered frame (dimensionless)
    /// default: 1.0
    pub time_step: f32,

    /// Phase advance per clock unit (phase = time * this)
    /// default: 0.5
    pub phase_rate: f32,

    /// Clock period divisor for the frequency sweep (sin(time / this))
    /// default: 30.0
    pub freq_cycle: f32,

    /// Sweep range for spatial frequency (cycles per image width)
    /// default: 20..200
    pub freq_range: (f32, f32),
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            divisions: 60,
            time_step: 1.0,
            phase_rate: 0.5,
            freq_cycle: 30.0,
            freq_range: (20.0, 200.0),
        }
    }
}

impl WaveParams {
    /// Validate parameters (divisions > 0, positive time step, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if self.divisions == 0 {
            return Err("divisions must be > 0".to_string());
        }
        if self.time_step <= 0.0 {
            return Err(format!("time step must be > 0, got {}", self.time_step));
        }
        if self.freq_range.0 > self.freq_range.1 {
            return Err(format!(
                "frequency range must be ascending, got {}..{}",
                self.freq_range.0, self.freq_range.1
            ));
        }
        Ok(())
    }
}

/// Background audio parameters
#[derive(Debug, Clone)]
pub struct AudioParams {
    /// Master gain applied to every sample (unitless, 0..1)
    /// default: 0.05, quiet accompaniment
    pub master_gain: f32,

    /// Hard clip ceiling applied after gain (absolute sample value)
    /// default: 0.5
    pub limiter_ceiling: f32,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            master_gain: 0.05,
            limiter_ceiling: 0.5,
        }
    }
}

impl AudioParams {
    /// Validate parameters (gain within 0..1, positive ceiling)
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.master_gain) {
            return Err(format!(
                "master gain must be in 0..1, got {}",
                self.master_gain
            ));
        }
        if self.limiter_ceiling <= 0.0 {
            return Err("limiter ceiling must be > 0".to_string());
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width before an image is loaded (pixels)
    pub window_width: u32,

    /// Window height before an image is loaded (pixels)
    pub window_height: u32,

    /// Stroke color for the wave lines (linear RGBA)
    pub stroke: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            stroke: [1.0, 1.0, 1.0, 1.0], // white on black
        }
    }
}

/// Audio constants (compile-time, match the glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    pub const BLOCK_SIZE: usize = 128;
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: String,

    /// Frame rate (FPS)
    pub fps: u32,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
            fps: 60,
        }
    }

    /// Total number of frames to capture
    pub fn total_frames(&self) -> usize {
        (self.duration_secs * self.fps as f32).ceil() as usize
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> String {
        format!("{}/frames", self.output_dir)
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_params_defaults_validate() {
        assert!(WaveParams::default().validate().is_ok());
    }

    #[test]
    fn test_wave_params_rejects_zero_divisions() {
        let params = WaveParams {
            divisions: 0,
            ..WaveParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_wave_params_rejects_bad_time_step() {
        let params = WaveParams {
            time_step: 0.0,
            ..WaveParams::default()
        };
        assert!(params.validate().is_err());

        let params = WaveParams {
            time_step: -0.5,
            ..WaveParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_wave_params_rejects_inverted_freq_range() {
        let params = WaveParams {
            freq_range: (200.0, 20.0),
            ..WaveParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_audio_params_validation() {
        assert!(AudioParams::default().validate().is_ok());

        let params = AudioParams {
            master_gain: 1.5,
            ..AudioParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_recording_total_frames() {
        let config = RecordingConfig::new(2.0);
        assert_eq!(config.total_frames(), 120);

        // Partial trailing frame rounds up
        let config = RecordingConfig::new(0.01);
        assert_eq!(config.total_frames(), 1);
    }
}
