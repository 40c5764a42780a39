//! Common structs, algorithms etc. used by Candela's shaders and renderer.

#![no_std]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

#[cfg(test)]
extern crate std;

mod atlas_mappings;
mod bvh;
mod camera;
mod hit;
mod material;
mod materials;
mod noise;
mod palette;
mod parallelogram;
mod parallelograms;
mod radiance;
mod ray;
mod registry;
mod scatter;
mod scene;
mod sdf;
mod sdfs;
#[cfg(test)]
mod testing;
mod texture;
mod tonemap;
mod triangle;
mod triangles;
mod uniforms;
mod utils;

pub use self::atlas_mappings::*;
pub use self::bvh::*;
pub use self::camera::*;
pub use self::hit::*;
pub use self::material::*;
pub use self::materials::*;
pub use self::noise::*;
pub use self::palette::*;
pub use self::parallelogram::*;
pub use self::parallelograms::*;
pub use self::radiance::*;
pub use self::ray::*;
pub use self::registry::*;
pub use self::scatter::*;
pub use self::scene::*;
pub use self::sdf::*;
pub use self::sdfs::*;
pub use self::texture::*;
pub use self::tonemap::*;
pub use self::triangle::*;
pub use self::triangles::*;
pub use self::uniforms::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::{
        vec2, vec3, vec4, Mat4, UVec2, UVec3, Vec2, Vec3, Vec3Swizzles, Vec4,
        Vec4Swizzles,
    };
    pub use spirv_std::{spirv, Sampler};

    pub use crate::*;
}
