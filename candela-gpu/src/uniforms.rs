use bytemuck::{Pod, Zeroable};
use glam::{vec2, vec4, UVec2, Vec2, Vec4, Vec4Swizzles};

use crate::{Camera, PrimaryRay, Ray};

/// Per-frame constants shared by every pass.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Uniforms {
    pub camera: Camera,

    /// x - width, y - height, z - 1 / width, w - 1 / height
    pub screen: Vec4,

    /// x - aspect ratio, y - global time in seconds, z - frame number (bits),
    /// w - pixel side subdivision (bits)
    pub data: Vec4,

    /// x - parallelogram count (bits), y - sdf instance count (bits),
    /// z - bvh node count (bits), w - unused
    pub counts: Vec4,
}

impl Uniforms {
    pub fn new(camera: Camera, width: u32, height: u32) -> Self {
        Self {
            camera,
            screen: vec4(
                width as f32,
                height as f32,
                1.0 / (width as f32),
                1.0 / (height as f32),
            ),
            data: vec4(
                width as f32 / height as f32,
                0.0,
                f32::from_bits(0),
                f32::from_bits(1),
            ),
            counts: Vec4::ZERO,
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen.xy()
    }

    pub fn contains(&self, pos: UVec2) -> bool {
        pos.x < (self.screen.x as u32) && pos.y < (self.screen.y as u32)
    }

    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * (self.screen.x as u32) + pos.x) as usize
    }

    pub fn aspect(&self) -> f32 {
        self.data.x
    }

    pub fn time(&self) -> f32 {
        self.data.y
    }

    pub fn frame_number(&self) -> u32 {
        self.data.z.to_bits()
    }

    pub fn set_frame_number(&mut self, frame: u32) {
        self.data.z = f32::from_bits(frame);
    }

    pub fn set_time(&mut self, time: f32) {
        self.data.y = time;
    }

    /// Anti-aliasing level; N means N² sub-pixel samples.
    pub fn pixel_side_subdivision(&self) -> u32 {
        let level = self.data.w.to_bits();

        if level == 0 {
            1
        } else {
            level
        }
    }

    pub fn set_pixel_side_subdivision(&mut self, level: u32) {
        self.data.w = f32::from_bits(level);
    }

    pub fn parallelogram_count(&self) -> u32 {
        self.counts.x.to_bits()
    }

    pub fn sdf_count(&self) -> u32 {
        self.counts.y.to_bits()
    }

    pub fn bvh_length(&self) -> u32 {
        self.counts.z.to_bits()
    }

    pub fn set_counts(
        &mut self,
        parallelograms: u32,
        sdfs: u32,
        bvh_nodes: u32,
    ) {
        self.counts = vec4(
            f32::from_bits(parallelograms),
            f32::from_bits(sdfs),
            f32::from_bits(bvh_nodes),
            0.0,
        );
    }

    pub fn ray(&self, pixel: Vec2, subpixel: Vec2) -> Ray {
        self.camera
            .ray(pixel, subpixel, self.screen_size(), self.aspect())
    }

    /// The camera ray plus the re-cast rays one pixel over along each screen
    /// axis.
    pub fn primary_ray(&self, pixel: Vec2, subpixel: Vec2) -> PrimaryRay {
        PrimaryRay {
            ray: self.ray(pixel, subpixel),
            dx: self.ray(pixel + vec2(1.0, 0.0), subpixel),
            dy: self.ray(pixel + vec2(0.0, 1.0), subpixel),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn screen_bounds_and_indexing() {
        let uniforms = Uniforms::new(Default::default(), 4, 3);

        assert!(uniforms.contains(uvec2(3, 2)));
        assert!(!uniforms.contains(uvec2(4, 2)));
        assert!(!uniforms.contains(uvec2(3, 3)));
        assert_eq!(uniforms.screen_to_idx(uvec2(1, 2)), 9);
    }

    #[test]
    fn packed_scalars_survive_the_round_trip() {
        let mut uniforms = Uniforms::new(Default::default(), 800, 600);

        uniforms.set_frame_number(1337);
        uniforms.set_pixel_side_subdivision(4);
        uniforms.set_counts(5, 2, 31);

        assert_eq!(uniforms.frame_number(), 1337);
        assert_eq!(uniforms.pixel_side_subdivision(), 4);
        assert_eq!(uniforms.parallelogram_count(), 5);
        assert_eq!(uniforms.sdf_count(), 2);
        assert_eq!(uniforms.bvh_length(), 31);
    }

    #[test]
    fn zero_subdivision_counts_as_one() {
        let uniforms = Uniforms {
            data: Vec4::ZERO,
            ..Uniforms::new(Default::default(), 2, 2)
        };

        assert_eq!(uniforms.pixel_side_subdivision(), 1);
    }
}
