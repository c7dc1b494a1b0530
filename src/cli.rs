//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::params::{RecordingConfig, WaveParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Lumawave")]
#[command(about = "Image-driven scanline waveform visualizer", long_about = None)]
pub struct Args {
    /// Image whose luminance drives the waveform (can also be dropped onto
    /// the window after launch)
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Number of horizontal wave bands
    #[arg(long, value_name = "COUNT", default_value = "60")]
    pub divisions: u32,

    /// Animation clock increment per frame
    #[arg(long, value_name = "STEP", default_value = "1.0")]
    pub time_step: f32,

    /// Record the visualization to disk (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Disable background audio
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    /// Wave parameters with the command-line tunables applied
    pub fn wave_params(&self) -> WaveParams {
        WaveParams {
            divisions: self.divisions,
            time_step: self.time_step,
            ..WaveParams::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> anyhow::Result<Option<RecordingConfig>> {
        self.record
            .map(|duration| {
                let config = RecordingConfig::new(duration);
                std::fs::create_dir_all(config.frames_dir())
                    .context("create frames directory")?;
                Ok(config)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tunables_reach_wave_params() {
        let args = Args::parse_from(["lumawave", "--divisions", "12", "--time-step", "0.25"]);
        let params = args.wave_params();

        assert_eq!(params.divisions, 12);
        assert_eq!(params.time_step, 0.25);
        // Untouched knobs keep their defaults
        assert_eq!(params.freq_range, WaveParams::default().freq_range);
    }

    #[test]
    fn test_image_positional_is_optional() {
        let args = Args::parse_from(["lumawave"]);
        assert!(args.image.is_none());

        let args = Args::parse_from(["lumawave", "portrait.png"]);
        assert_eq!(args.image, Some(PathBuf::from("portrait.png")));
    }
}
