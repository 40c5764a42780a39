use core::f32::consts::PI;

use glam::{vec2, vec3, Vec2, Vec3};
use spirv_std::num_traits::Float;

/// Per-pixel, per-frame white noise; a small PCG permutation over a 32-bit
/// state.
///
/// Every invocation owns its stream, so the image stays bit-stable no matter
/// how the pixels get scheduled.
#[derive(Copy, Clone)]
pub struct Noise {
    state: u32,
}

impl Noise {
    const FRAME_SALT: u32 = 719393;

    pub fn new(pixel_index: u32, frame: u32) -> Self {
        Self {
            state: pixel_index.wrapping_add(frame.wrapping_mul(Self::FRAME_SALT)),
        }
    }

    /// Generates a uniform sample in range [0.0, 1.0).
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() as f32) / 4294967296.0
    }

    /// Generates a uniform sample in range (0, u32::MAX).
    pub fn sample_int(&mut self) -> u32 {
        self.state =
            self.state.wrapping_mul(747796405).wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform sample in range [min, max).
    pub fn sample_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.sample()
    }

    /// Generates a uniform sample inside the unit sphere.
    pub fn sample_in_sphere(&mut self) -> Vec3 {
        let z = 1.0 - 2.0 * self.sample();
        let angle = 2.0 * PI * self.sample();
        let radius = (1.0 - z * z).max(0.0).sqrt();

        vec3(radius * angle.cos(), radius * angle.sin(), z)
            * self.sample().powf(1.0 / 3.0)
    }

    /// Generates a cosine-weighted sample around +Z, ready to be rotated into
    /// a surface basis.
    pub fn sample_cosine_direction(&mut self) -> Vec3 {
        let r1 = self.sample();
        let r2 = self.sample();
        let angle = 2.0 * PI * r1;

        vec3(
            angle.cos() * r2.sqrt(),
            angle.sin() * r2.sqrt(),
            (1.0 - r2).sqrt(),
        )
    }
}

/// Coarse position-seeded hash, `fract(sin(·) · 43758.5453)`.
///
/// The analytic pass jitters its mirror reflections with this instead of
/// [`Noise`]: the PCG stream reads too uniform there and flattens the
/// roughness look.
pub fn position_hash(seed: Vec2) -> f32 {
    (seed.dot(vec2(12.9898, 78.233)).sin() * 43758.5453).fract()
}
