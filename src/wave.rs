//! Scanline wave mesh with luminance-driven amplitude modulation.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

use crate::luma::LumaField;
use crate::math::map_range;
use crate::params::WaveParams;

/// Vertex data for the wave mesh (image pixel-space position)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

/// Line mesh covering every horizontal band of the source image
pub struct WaveGrid {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    luma: LumaField,
    band_size: f32,
    divisions: u32,
}

impl WaveGrid {
    /// Build the mesh: one polyline per band, one vertex per pixel column.
    ///
    /// The image height is split into `divisions` equal bands. Indices are
    /// line-list pairs joining adjacent columns within a band; bands are not
    /// connected to each other.
    pub fn new(luma: LumaField, params: &WaveParams) -> Self {
        let width = luma.width;
        let divisions = params.divisions;
        let band_size = luma.height as f32 / divisions as f32;

        let mut vertices = Vec::with_capacity((divisions * width) as usize);
        let mut indices = Vec::with_capacity((divisions * width.saturating_sub(1) * 2) as usize);

        for band in 0..divisions {
            let y = band_center(band, band_size);
            let base = band * width;
            for x in 0..width {
                vertices.push(Vertex {
                    position: [x as f32, y],
                });
                if x + 1 < width {
                    indices.extend_from_slice(&[base + x, base + x + 1]);
                }
            }
        }

        Self {
            vertices,
            indices,
            luma,
            band_size,
            divisions,
        }
    }

    pub fn width(&self) -> u32 {
        self.luma.width
    }

    pub fn height(&self) -> u32 {
        self.luma.height
    }

    /// Recompute vertex heights for the given animation state.
    ///
    /// Each band carries a sine wave whose amplitude at a column is set by
    /// the luminance of the band's center scanline: dark pixels swing the
    /// full half-band, white pixels flatten the line onto its center.
    pub fn update(&mut self, phase: f32, frequency: f32) {
        let width = self.luma.width;
        let max_amplitude = self.band_size / 2.0;

        for band in 0..self.divisions {
            let y = band_center(band, self.band_size);
            let scanline = y as u32;
            for x in 0..width {
                let angle = map_range(x as f32, 0.0, width as f32, 0.0, 2.0 * PI);
                let sine = (phase + angle * frequency).sin();
                let gray = self.luma.sample(x, scanline);
                let amplitude = map_range(gray, 0.0, 255.0, max_amplitude, 0.0);

                self.vertices[(band * width + x) as usize].position[1] = y + sine * amplitude;
            }
        }
    }
}

/// Center scanline of a band (pixel-space y)
fn band_center(band: u32, band_size: f32) -> f32 {
    band_size / 2.0 + band as f32 * band_size
}

/// High-level wave system owning the animation clock
pub struct WaveSystem {
    pub grid: WaveGrid,
    params: WaveParams,
    time: f32,
}

impl WaveSystem {
    /// Create a new wave system over a luminance field
    pub fn new(luma: LumaField, params: WaveParams) -> Self {
        let grid = WaveGrid::new(luma, &params);
        Self {
            grid,
            params,
            time: 0.0,
        }
    }

    /// Advance the animation one frame and update the mesh.
    ///
    /// The clock is frame-counted: it advances by `time_step` per call
    /// regardless of wall time. Phase scrolls linearly while the spatial
    /// frequency sweeps sinusoidally across `freq_range`.
    ///
    /// # Returns
    /// Tuple of (phase, frequency) for the frame just produced
    pub fn update(&mut self) -> (f32, f32) {
        let phase = self.time * self.params.phase_rate;
        let frequency = map_range(
            (self.time / self.params.freq_cycle).sin(),
            -1.0,
            1.0,
            self.params.freq_range.0,
            self.params.freq_range.1,
        );

        self.grid.update(phase, frequency);
        self.time += self.params.time_step;

        (phase, frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn field(width: u32, height: u32, gray: u8) -> LumaField {
        LumaField::from_image(&RgbaImage::from_pixel(
            width,
            height,
            Rgba([gray, gray, gray, 255]),
        ))
    }

    #[test]
    fn test_mesh_counts() {
        let params = WaveParams {
            divisions: 4,
            ..WaveParams::default()
        };
        let grid = WaveGrid::new(field(10, 8, 128), &params);

        // One vertex per column per band
        assert_eq!(grid.vertices.len(), 4 * 10);
        // Line-list pairs: (width - 1) segments per band
        assert_eq!(grid.indices.len(), 4 * 9 * 2);
    }

    #[test]
    fn test_band_centers() {
        let params = WaveParams {
            divisions: 2,
            ..WaveParams::default()
        };
        let grid = WaveGrid::new(field(4, 8, 0), &params);

        // band_size = 4, centers at 2 and 6
        assert_eq!(grid.vertices[0].position[1], 2.0);
        assert_eq!(grid.vertices[4].position[1], 6.0);
    }

    #[test]
    fn test_white_image_stays_flat() {
        let params = WaveParams {
            divisions: 3,
            ..WaveParams::default()
        };
        let mut system = WaveSystem::new(field(16, 9, 255), params);
        system.update();
        system.update();

        // Full luminance maps to zero amplitude, so every vertex sits on
        // its band center
        let band_size = 3.0;
        for (i, vertex) in system.grid.vertices.iter().enumerate() {
            let band = i as u32 / 16;
            let center = band_size / 2.0 + band as f32 * band_size;
            assert!(
                (vertex.position[1] - center).abs() < 1e-5,
                "vertex {} drifted to {}",
                i,
                vertex.position[1]
            );
        }
    }

    #[test]
    fn test_black_image_swings_within_band() {
        let params = WaveParams {
            divisions: 3,
            ..WaveParams::default()
        };
        let mut system = WaveSystem::new(field(32, 12, 0), params);
        system.update();

        let band_size = 4.0;
        let max_amplitude = band_size / 2.0;
        let mut peak: f32 = 0.0;
        for (i, vertex) in system.grid.vertices.iter().enumerate() {
            let band = i as u32 / 32;
            let center = band_size / 2.0 + band as f32 * band_size;
            let offset = (vertex.position[1] - center).abs();
            assert!(offset <= max_amplitude + 1e-4);
            peak = peak.max(offset);
        }

        // Zero luminance gives full swing; the sine must actually move
        assert!(peak > max_amplitude * 0.5);
    }

    #[test]
    fn test_frequency_sweep_stays_in_range() {
        let params = WaveParams::default();
        let (min, max) = params.freq_range;
        let mut system = WaveSystem::new(field(4, 4, 200), params);

        for _ in 0..500 {
            let (_, frequency) = system.update();
            assert!(frequency >= min - 1e-3 && frequency <= max + 1e-3);
        }
    }

    #[test]
    fn test_more_divisions_than_scanlines() {
        // Fractional band sizes: sampling clamps, nothing panics
        let params = WaveParams {
            divisions: 9,
            ..WaveParams::default()
        };
        let mut system = WaveSystem::new(field(6, 4, 64), params);
        system.update();

        assert_eq!(system.grid.vertices.len(), 9 * 6);
    }
}
