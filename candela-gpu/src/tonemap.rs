use glam::{vec2, Vec2, Vec3};
use spirv_std::num_traits::Float;

const GAMMA: f32 = 2.2;

/// ACES filmic approximation (Narkowicz).
pub fn aces_film(color: Vec3) -> Vec3 {
    let a = 2.51;
    let b = 0.03;
    let c = 2.43;
    let d = 0.59;
    let e = 0.14;

    ((color * (a * color + b)) / (color * (c * color + d) + e))
        .clamp(Vec3::ZERO, Vec3::ONE)
}

pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.powf(1.0 / GAMMA)
}

/// Jimenez interleaved gradient noise over the fragment position.
pub fn gradient_noise(position: Vec2) -> f32 {
    (52.9829189 * (position.dot(vec2(0.06711056, 0.00583715))).fract())
        .fract()
}

/// Sub-quantum offset hiding banding in the 8-bit target.
pub fn dither_offset(position: Vec2) -> f32 {
    (gradient_noise(position) - 0.5) / 255.0
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn tonemapped_output_stays_in_unit_range() {
        for scale in [0.0, 0.25, 1.0, 4.0, 1000.0] {
            let mapped = aces_film(vec3(scale, scale * 0.5, scale * 0.25));

            assert!(mapped.min_element() >= 0.0);
            assert!(mapped.max_element() <= 1.0);
        }
    }

    #[test]
    fn tonemapping_is_monotonic_in_exposure() {
        let darker = aces_film(Vec3::splat(0.5));
        let brighter = aces_film(Vec3::splat(1.5));

        assert!(brighter.x > darker.x);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let corrected = gamma_correct(Vec3::splat(0.5));

        assert!(corrected.x > 0.5);
        assert!(corrected.x < 1.0);
    }

    #[test]
    fn dither_amplitude_is_below_half_a_quantum() {
        for i in 0..256 {
            let position = vec2((i % 16) as f32, (i / 16) as f32);
            let offset = dither_offset(position);

            assert!(offset.abs() <= 0.5 / 255.0);
        }
    }
}
