//! Lumawave - image-driven scanline waveform visualization
//!
//! Every horizontal band of a dropped-in image samples its center scanline
//! for luminance, which sets the amplitude of a scrolling sine wave stroked
//! across the window, over a quiet procedural soundtrack.

mod audio;
mod cli;
mod luma;
mod math;
mod params;
mod rendering;
mod wave;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use glam::Mat4;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use audio::AudioSystem;
use cli::Args;
use luma::LumaField;
use params::{AudioParams, RecordingConfig, RenderConfig, WaveParams};
use rendering::{RenderSystem, Uniforms};
use wave::WaveSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Visualization and audio
    wave: Option<WaveSystem>,
    audio: Option<AudioSystem>,

    // Configuration
    wave_params: WaveParams,
    audio_params: AudioParams,
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,
    muted: bool,

    // Frame tracking
    frame_num: usize,
}

impl App {
    fn new(args: Args) -> anyhow::Result<Self> {
        let wave_params = args.wave_params();
        wave_params.validate().map_err(anyhow::Error::msg)?;

        let recording_config = args.create_recording_config()?;
        if recording_config.is_some() && args.image.is_none() {
            anyhow::bail!("--record needs an image to visualize");
        }

        // An unreadable image on the command line is a hard error; a bad
        // file dropped onto the window later is only a warning.
        let wave = match &args.image {
            Some(path) => {
                let field = LumaField::from_path(path)?;
                log::info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    field.width,
                    field.height
                );
                Some(WaveSystem::new(field, wave_params.clone()))
            }
            None => None,
        };

        Ok(Self {
            window: None,
            render_system: None,
            wave,
            audio: None,
            wave_params,
            audio_params: AudioParams::default(),
            render_config: RenderConfig::default(),
            recording_config,
            muted: args.mute,
            frame_num: 0,
        })
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Size the window to the image; fall back to the idle size until one
        // is dropped in
        let (size, title) = match &self.wave {
            Some(wave) => (
                PhysicalSize::new(wave.grid.width(), wave.grid.height()),
                "Lumawave",
            ),
            None => (
                PhysicalSize::new(
                    self.render_config.window_width,
                    self.render_config.window_height,
                ),
                "Lumawave - drop an image to begin",
            ),
        };

        let window_attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(size);

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.wave.as_ref().map(|wave| &wave.grid),
            self.recording_config.clone(),
        ))
        .unwrap();

        self.window = Some(window);
        self.render_system = Some(render_system);

        if self.wave.is_some() {
            self.start_audio();
        }

        log::info!("press ESC to quit, drop an image to switch");
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::DroppedFile(path) => {
                self.load_image(&path);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();

                // Recording runs for a fixed number of frames, then exits
                if let Some(config) = &self.recording_config {
                    if self.frame_num >= config.total_frames() {
                        log::info!(
                            "recording complete: {} frames in {}",
                            config.total_frames(),
                            config.frames_dir()
                        );
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(render_system) = &self.render_system else {
            return;
        };

        if let Some(wave) = &mut self.wave {
            let (phase, frequency) = wave.update();

            // Map image pixel coordinates (y down) onto the surface
            let view_proj = Mat4::orthographic_rh(
                0.0,
                wave.grid.width() as f32,
                wave.grid.height() as f32,
                0.0,
                -1.0,
                1.0,
            );

            render_system.update_vertices(&wave.grid.vertices);
            render_system.update_uniforms(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
                stroke: self.render_config.stroke,
            });

            log::trace!(
                "frame {}: phase {:.2} frequency {:.1}",
                self.frame_num,
                phase,
                frequency
            );
        }

        if let Err(e) = render_system.render(self.frame_num) {
            log::error!("render error: {:?}", e);
        }

        self.frame_num += 1;
    }

    /// Swap in a dropped image; on failure keep the current state
    fn load_image(&mut self, path: &Path) {
        match LumaField::from_path(path) {
            Ok(field) => {
                log::info!(
                    "loaded {} ({}x{})",
                    path.display(),
                    field.width,
                    field.height
                );

                if let Some(window) = &self.window {
                    let _ = window.request_inner_size(PhysicalSize::new(field.width, field.height));
                    window.set_title("Lumawave");
                }

                let wave = WaveSystem::new(field, self.wave_params.clone());
                if let Some(render_system) = &mut self.render_system {
                    render_system.rebuild_mesh(&wave.grid);
                }
                self.wave = Some(wave);

                self.start_audio();
            }
            // The single format check: anything undecodable is rejected here
            Err(e) => log::warn!("{}: not a usable image: {:#}", path.display(), e),
        }
    }

    /// Start background audio on the first successful image load
    fn start_audio(&mut self) {
        if self.muted || self.audio.is_some() {
            return;
        }
        match AudioSystem::new(self.audio_params.clone(), self.recording_config.clone()) {
            Ok(audio) => self.audio = Some(audio),
            // Audio is accompaniment; keep rendering without it
            Err(e) => log::warn!("audio disabled: {:#}", e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut app = App::new(args)?;

    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
