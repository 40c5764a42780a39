use bytemuck::{Pod, Zeroable};
use glam::{vec2, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};
use spirv_std::Sampler;
use spirv_std::num_traits::Float;

use crate::{
    AtlasMappingsView, HitPlace, Material, RayDifferentials, Registry, Tex,
};

pub const WRAP_MODE_REPEAT: i32 = 0;
pub const WRAP_MODE_CLAMP: i32 = 1;
pub const WRAP_MODE_DISCARD: i32 = 2;

/// Where a material's texture lives inside the atlas page and how local
/// positions turn into texture coordinates.
///
/// The two rows form a 2×4 matrix over the homogeneous local position, which
/// is enough to encode the planar and tri-planar projections the CPU authors.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct AtlasMapping {
    /// x, y - top-left corner in atlas uv, z, w - region size in atlas uv
    pub region: Vec4,

    /// Row mapping the homogeneous local position to texture u.
    pub to_u: Vec4,

    /// Row mapping the homogeneous local position to texture v.
    pub to_v: Vec4,

    /// x - wrap mode along u (i32 bits), y - wrap mode along v (i32 bits)
    pub wrap: Vec4,
}

impl AtlasMapping {
    pub fn new(
        top_left: Vec2,
        size: Vec2,
        to_u: Vec4,
        to_v: Vec4,
        wrap_modes: [i32; 2],
    ) -> Self {
        Self {
            region: vec2_pair(top_left, size),
            to_u,
            to_v,
            wrap: Vec4::new(
                f32::from_bits(wrap_modes[0] as u32),
                f32::from_bits(wrap_modes[1] as u32),
                0.0,
                0.0,
            ),
        }
    }

    pub fn top_left(&self) -> Vec2 {
        self.region.xy()
    }

    pub fn size(&self) -> Vec2 {
        vec2(self.region.z, self.region.w)
    }

    pub fn wrap_u(&self) -> i32 {
        self.wrap.x.to_bits() as i32
    }

    pub fn wrap_v(&self) -> i32 {
        self.wrap.y.to_bits() as i32
    }

    /// Unclamped region-space coordinate of a local position.
    pub fn project(&self, position: Vec3) -> Vec2 {
        let homogeneous = position.extend(1.0);

        vec2(self.to_u.dot(homogeneous), self.to_v.dot(homogeneous))
    }

    /// Same mapping applied to a position delta.
    pub fn project_delta(&self, delta: Vec3) -> Vec2 {
        let homogeneous = delta.extend(0.0);

        vec2(self.to_u.dot(homogeneous), self.to_v.dot(homogeneous))
    }
}

fn vec2_pair(a: Vec2, b: Vec2) -> Vec4 {
    Vec4::new(a.x, a.y, b.x, b.y)
}

/// Applies one axis' wrap policy; returns the wrapped coordinate and its
/// coverage (zero coverage discards the texel).
pub fn wrap_coordinate(coordinate: f32, mode: i32, inset: f32) -> (f32, f32) {
    if mode == WRAP_MODE_REPEAT {
        (coordinate - coordinate.floor(), 1.0)
    } else if mode == WRAP_MODE_CLAMP {
        (coordinate.clamp(inset, 1.0 - inset), 1.0)
    } else if coordinate < inset || coordinate > 1.0 - inset {
        (coordinate, 0.0)
    } else {
        (coordinate, 1.0)
    }
}

/// Mip level implied by the texel-space footprint of one pixel.
pub fn mip_level(ddx_texels: Vec2, ddy_texels: Vec2, level_count: u32) -> u32 {
    let footprint = ddx_texels.length().max(ddy_texels.length());

    if footprint <= 1.0 {
        return 0;
    }

    let level = (0.5 * footprint.log2()).floor();

    (level as u32).min(level_count.max(1) - 1)
}

/// Snapping the lookup point to a coarse grid removes edge-case flicker in
/// discontinuous procedural textures.
pub fn snap_to_grid(point: Vec3, step: f32) -> Vec3 {
    (point / step).round() * step
}

impl Material {
    /// Resolves the surface albedo at a hit: flat color, procedural texture,
    /// or a gradient-sampled atlas region, keyed by the signed texture uid.
    pub fn albedo<R>(
        &self,
        registry: &R,
        atlas_tex: Tex,
        atlas_sampler: &Sampler,
        atlas_mappings: AtlasMappingsView,
        local: &HitPlace,
        time: f32,
        differentials: &RayDifferentials,
    ) -> Vec3
    where
        R: Registry,
    {
        let uid = self.albedo_texture_uid();

        if uid == 0 {
            return self.albedo_color();
        }

        if uid < 0 {
            return registry.procedural_color(
                (-uid) as u32,
                snap_to_grid(local.position, 1e-4),
                local.normal,
                time,
                differentials.dp_dx,
                differentials.dp_dy,
            );
        }

        let mapping = atlas_mappings.get((uid - 1) as u32);
        let coordinate = mapping.project(local.position);
        let ddx = mapping.project_delta(differentials.dp_dx) * mapping.size();
        let ddy = mapping.project_delta(differentials.dp_dy) * mapping.size();

        let page: UVec2 = atlas_tex.query_size_lod(0);
        let page_texels = page.as_vec2();

        let level = mip_level(
            ddx * page_texels,
            ddy * page_texels,
            atlas_tex.query_levels(),
        );

        let mip_texels = page_texels / ((1u32 << level) as f32);
        let inset = 0.5 / mip_texels / mapping.size();

        let (u, coverage_u) =
            wrap_coordinate(coordinate.x, mapping.wrap_u(), inset.x);
        let (v, coverage_v) =
            wrap_coordinate(coordinate.y, mapping.wrap_v(), inset.y);

        // Transparent texels fall through to the flat albedo.
        if coverage_u * coverage_v == 0.0 {
            return self.albedo_color();
        }

        let atlas_uv = mapping.top_left() + vec2(u, v) * mapping.size();

        let sample: Vec4 =
            atlas_tex.sample_by_gradient(*atlas_sampler, atlas_uv, ddx, ddy);

        sample.xyz()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;
    use crate::{
        AtlasImage, MaterialClass, TEXTURE_CHECKERBOARD, BuiltinPalette,
    };

    #[test]
    fn repeat_wrapping_is_periodic() {
        for coordinate in [-1.75, 0.25, 1.25, 7.25] {
            let (wrapped, coverage) =
                wrap_coordinate(coordinate, WRAP_MODE_REPEAT, 0.0);

            assert_relative_eq!(wrapped, 0.25, epsilon = 1e-5);
            assert_eq!(coverage, 1.0);
        }
    }

    #[test]
    fn clamping_pins_out_of_range_lookups_to_the_inset() {
        let inset = 1.0 / 16.0;

        let (low, _) = wrap_coordinate(-3.0, WRAP_MODE_CLAMP, inset);
        let (high, _) = wrap_coordinate(42.0, WRAP_MODE_CLAMP, inset);
        let (mid, _) = wrap_coordinate(0.5, WRAP_MODE_CLAMP, inset);

        assert_eq!(low, inset);
        assert_eq!(high, 1.0 - inset);
        assert_eq!(mid, 0.5);
    }

    #[test]
    fn discarding_zeroes_the_coverage_outside_the_region() {
        let inset = 1.0 / 16.0;

        let (_, outside) = wrap_coordinate(1.2, WRAP_MODE_DISCARD, inset);
        let (_, inside) = wrap_coordinate(0.5, WRAP_MODE_DISCARD, inset);

        assert_eq!(outside, 0.0);
        assert_eq!(inside, 1.0);
    }

    #[test]
    fn mip_selection_grows_with_the_footprint_and_clamps() {
        assert_eq!(mip_level(Vec2::ZERO, Vec2::ZERO, 8), 0);
        assert_eq!(mip_level(vec2(1.0, 0.0), Vec2::ZERO, 8), 0);

        let coarse = mip_level(vec2(64.0, 0.0), Vec2::ZERO, 8);
        let coarser = mip_level(vec2(4096.0, 0.0), Vec2::ZERO, 8);

        assert!(coarse >= 1);
        assert!(coarser >= coarse);
        assert!(coarser <= 7);

        // Never exceeds the chain.
        assert_eq!(mip_level(vec2(1e9, 0.0), Vec2::ZERO, 4), 3);
    }

    #[test]
    fn projection_routes_axes_through_the_mapping_rows() {
        // z -> u, x -> v; the row layout the CPU uses for planar projections.
        let mapping = AtlasMapping::new(
            Vec2::ZERO,
            Vec2::ONE,
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            [WRAP_MODE_REPEAT; 2],
        );

        let projected = mapping.project(vec3(0.25, 0.5, 0.75));

        assert_relative_eq!(projected.x, 0.75);
        assert_relative_eq!(projected.y, 0.25);

        // The constant column shifts coordinates, but not deltas.
        let shifted = AtlasMapping::new(
            Vec2::ZERO,
            Vec2::ONE,
            Vec4::new(1.0, 0.0, 0.0, 0.5),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            [WRAP_MODE_REPEAT; 2],
        );

        assert_relative_eq!(shifted.project(vec3(0.25, 0.0, 0.0)).x, 0.75);
        assert_relative_eq!(
            shifted.project_delta(vec3(0.25, 0.0, 0.0)).x,
            0.25
        );
    }

    #[test]
    fn grid_snapping_is_idempotent() {
        let snapped = snap_to_grid(vec3(0.123456, -0.5, 1.0), 1e-4);

        assert_eq!(snapped, snap_to_grid(snapped, 1e-4));
        assert_relative_eq!(snapped.x, 0.1235, epsilon = 1e-6);
    }

    #[test]
    fn flat_and_procedural_albedo_skip_the_atlas() {
        let image: AtlasImage = unsafe { core::mem::zeroed() };
        let sampler: Sampler = unsafe { core::mem::zeroed() };
        let mappings = AtlasMappingsView::new(&[]);
        let palette = BuiltinPalette;

        let place = HitPlace {
            position: vec3(0.05, 0.05, 0.05),
            normal: vec3(0.0, 0.0, 1.0),
        };

        let flat = Material::new(MaterialClass::Lambertian)
            .with_albedo(0.25, 0.5, 0.75);

        assert_eq!(
            flat.albedo(
                &palette,
                &image,
                &sampler,
                mappings,
                &place,
                0.0,
                &RayDifferentials::none(),
            ),
            vec3(0.25, 0.5, 0.75)
        );

        let textured = flat.with_albedo_texture(-(TEXTURE_CHECKERBOARD as i32));

        let color = textured.albedo(
            &palette,
            &image,
            &sampler,
            mappings,
            &place,
            0.0,
            &RayDifferentials::none(),
        );

        // First checkerboard cell.
        assert_eq!(color, Vec3::ZERO);
    }
}
