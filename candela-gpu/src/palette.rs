use glam::{vec2, Vec3, Vec3Swizzles};
use spirv_std::num_traits::Float;

use crate::Registry;

pub const SDF_CLASS_SPHERE: u32 = 1;
pub const SDF_CLASS_BOX: u32 = 2;
pub const SDF_CLASS_TORUS: u32 = 3;
pub const SDF_CLASS_PULSING_SPHERE: u32 = 4;

pub const TEXTURE_CHECKERBOARD: u32 = 1;
pub const TEXTURE_STRIPES: u32 = 2;

/// The stock signed-distance classes and procedural textures.
#[derive(Copy, Clone, Default)]
pub struct BuiltinPalette;

impl Registry for BuiltinPalette {
    fn sdf_distance(&self, class: u32, point: Vec3, time: f32) -> f32 {
        match class {
            SDF_CLASS_SPHERE => sd_sphere(point, 1.0),
            SDF_CLASS_BOX => sd_box(point, Vec3::ONE),
            SDF_CLASS_TORUS => sd_torus(point, 1.0, 0.35),
            SDF_CLASS_PULSING_SPHERE => sd_sphere(point, pulse_scale(time)),
            _ => f32::MAX,
        }
    }

    fn sdf_rest_position(&self, class: u32, point: Vec3, time: f32) -> Vec3 {
        match class {
            SDF_CLASS_PULSING_SPHERE => point / pulse_scale(time),
            _ => point,
        }
    }

    fn procedural_color(
        &self,
        id: u32,
        point: Vec3,
        _normal: Vec3,
        _time: f32,
        _dp_dx: Vec3,
        _dp_dy: Vec3,
    ) -> Vec3 {
        match id {
            TEXTURE_CHECKERBOARD => {
                let cell = (point * 10.0).floor();

                if ((cell.x + cell.y + cell.z) as i32) % 2 == 0 {
                    Vec3::ZERO
                } else {
                    Vec3::ONE
                }
            }

            TEXTURE_STRIPES => {
                if ((point.x * 10.0).floor() as i32) % 2 == 0 {
                    Vec3::new(0.8, 0.2, 0.2)
                } else {
                    Vec3::new(0.9, 0.9, 0.9)
                }
            }

            _ => Vec3::ZERO,
        }
    }
}

fn pulse_scale(time: f32) -> f32 {
    1.0 + 0.25 * time.sin()
}

fn sd_sphere(point: Vec3, radius: f32) -> f32 {
    point.length() - radius
}

fn sd_box(point: Vec3, half_extent: Vec3) -> f32 {
    let q = point.abs() - half_extent;

    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

fn sd_torus(point: Vec3, major: f32, minor: f32) -> f32 {
    let q = vec2(point.xz().length() - major, point.y);

    q.length() - minor
}
