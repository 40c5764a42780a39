use candela_gpu::prelude::*;

/// First-hit pass: object uid, resolved albedo, and world normal per pixel,
/// written once per frame before the color pass.
#[spirv(compute(threads(8, 8)))]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] uniforms: &Uniforms,
    #[spirv(descriptor_set = 1, binding = 1, storage_buffer)]
    object_ids: &mut [u32],
    #[spirv(descriptor_set = 1, binding = 2, storage_buffer)]
    albedos: &mut [Vec4],
    #[spirv(descriptor_set = 1, binding = 3, storage_buffer)]
    normals: &mut [Vec4],
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

    let primary =
        uniforms.primary_ray(screen_pos.as_vec2(), vec2(0.5, 0.5));

    let mut hit = HitRecord::none();

    if primary.ray.trace_nearest(&scene, &mut hit) {
        let differentials =
            RayDifferentials::at_primary_hit(&primary.dx, &primary.dy, &hit);

        let albedo = scene.materials.get(hit.material_id).albedo(
            &scene.registry,
            atlas_tex,
            atlas_sampler,
            scene.atlas_mappings,
            &hit.local,
            uniforms.time(),
            &differentials,
        );

        object_ids[screen_idx] = hit.object_uid;
        albedos[screen_idx] = albedo.extend(1.0);
        normals[screen_idx] = hit.global.normal.extend(0.0);
    } else {
        object_ids[screen_idx] = 0;
        albedos[screen_idx] = Vec4::new(0.0, 0.0, 0.0, 1.0);
        normals[screen_idx] = Vec4::ZERO;
    }
}
