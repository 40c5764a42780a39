use candela_gpu::prelude::*;

/// Accumulates one stochastic frame into the linear color buffer; the
/// resolve pass divides by the frame counter.
#[spirv(compute(threads(8, 8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] uniforms: &Uniforms,
    #[spirv(descriptor_set = 1, binding = 0, storage_buffer)]
    colors: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 0, storage_buffer)]
    parallelograms: &[Parallelogram],
    #[spirv(descriptor_set = 2, binding = 1, storage_buffer)]
    triangles: &[Triangle],
    #[spirv(descriptor_set = 2, binding = 2, storage_buffer)]
    sdfs: &[SdfInstance],
    #[spirv(descriptor_set = 2, binding = 3, storage_buffer)]
    sdf_times: &[f32],
    #[spirv(descriptor_set = 2, binding = 4, storage_buffer)]
    materials: &[Material],
    #[spirv(descriptor_set = 2, binding = 5, storage_buffer)]
    bvh: &[BvhNode],
    #[spirv(descriptor_set = 2, binding = 6, storage_buffer)]
    bvh_inflated: &[BvhNode],
    #[spirv(descriptor_set = 2, binding = 7, storage_buffer)]
    atlas_mappings: &[AtlasMapping],
    #[spirv(descriptor_set = 3, binding = 0)] atlas_tex: Tex,
    #[spirv(descriptor_set = 3, binding = 1)] atlas_sampler: &Sampler,
) {
    let screen_pos = global_id.xy();

    if !uniforms.contains(screen_pos) {
        return;
    }

    let screen_idx = uniforms.screen_to_idx(screen_pos);

    let scene = Scene {
        uniforms,
        parallelograms: ParallelogramsView::new(parallelograms),
        triangles: TrianglesView::new(triangles),
        sdfs: SdfsView::new(sdfs, sdf_times),
        materials: MaterialsView::new(materials),
        atlas_mappings: AtlasMappingsView::new(atlas_mappings),
        bvh: BvhView::new(bvh),
        bvh_inflated: BvhView::new(bvh_inflated),
        registry: BuiltinPalette,
    };

    let mut noise = Noise::new(screen_idx as u32, uniforms.frame_number());
    let pixel = screen_pos.as_vec2();
    let subdivision = uniforms.pixel_side_subdivision();

    let mut color = Vec3::ZERO;

    if subdivision == 1 {
        let subpixel = vec2(noise.sample(), noise.sample());
        let primary = uniforms.primary_ray(pixel, subpixel);

        color = trace_monte_carlo(
            &scene,
            atlas_tex,
            atlas_sampler,
            &primary,
            &mut noise,
        );
    } else {
        let mut y = 0;

        while y < subdivision {
            let mut x = 0;

            while x < subdivision {
                let subpixel = vec2(
                    (x as f32 + noise.sample()) / (subdivision as f32),
                    (y as f32 + noise.sample()) / (subdivision as f32),
                );

                let primary = uniforms.primary_ray(pixel, subpixel);

                color += trace_monte_carlo(
                    &scene,
                    atlas_tex,
                    atlas_sampler,
                    &primary,
                    &mut noise,
                );

                x += 1;
            }

            y += 1;
        }

        color /= (subdivision * subdivision) as f32;
    }

    colors[screen_idx] += color.extend(0.0);
}
