//! Shared test fixtures: a CPU-side scene assembled the way the host crate
//! does it, skip-link hierarchy included.

use std::vec::Vec;

use glam::Vec3;

use crate::bvh::test_builder::{self, Item};
use crate::{
    AtlasMappingsView, BuiltinPalette, BvhNode, BvhView, Material,
    MaterialsView, Parallelogram, ParallelogramsView, Scene, SdfInstance,
    SdfsView, Triangle, TrianglesView, Uniforms,
};

pub(crate) struct SceneData {
    pub parallelograms: Vec<Parallelogram>,
    pub triangles: Vec<Triangle>,
    pub sdfs: Vec<SdfInstance>,
    pub sdf_times: Vec<f32>,
    pub materials: Vec<Material>,
    pub bvh: Vec<BvhNode>,
    pub bvh_inflated: Vec<BvhNode>,
    pub uniforms: Uniforms,
}

impl SceneData {
    /// Sdf instances come with their animation time and a world-space AABB.
    pub(crate) fn new(
        parallelograms: Vec<Parallelogram>,
        triangles: Vec<Triangle>,
        sdfs: Vec<(SdfInstance, f32, Vec3, Vec3)>,
        materials: Vec<Material>,
    ) -> Self {
        let mut items = Vec::new();

        for (i, triangle) in triangles.iter().enumerate() {
            let aabb_min = triangle
                .position0()
                .min(triangle.position1())
                .min(triangle.position2());

            let aabb_max = triangle
                .position0()
                .max(triangle.position1())
                .max(triangle.position2());

            items.push(Item {
                aabb_min: aabb_min - Vec3::splat(1e-4),
                aabb_max: aabb_max + Vec3::splat(1e-4),
                primitive_kind: BvhNode::PRIMITIVE_TRIANGLE,
                primitive_index: i as u32,
            });
        }

        for (i, (_, _, aabb_min, aabb_max)) in sdfs.iter().enumerate() {
            items.push(Item {
                aabb_min: *aabb_min,
                aabb_max: *aabb_max,
                primitive_kind: BvhNode::PRIMITIVE_SDF,
                primitive_index: i as u32,
            });
        }

        let bvh = if items.is_empty() {
            Vec::new()
        } else {
            test_builder::build(&items)
        };

        // Inflated copy: same topology, each box grown by half its extent.
        let bvh_inflated: Vec<_> = bvh
            .iter()
            .map(|node| {
                let half = 0.5 * (node.aabb_max() - node.aabb_min());
                let mut inflated = *node;

                inflated.d0 = (node.aabb_min() - half).extend(node.d0.w);
                inflated.d1 = (node.aabb_max() + half).extend(node.d1.w);

                inflated
            })
            .collect();

        let mut uniforms = Uniforms::new(Default::default(), 16, 16);

        uniforms.set_counts(
            parallelograms.len() as u32,
            sdfs.len() as u32,
            bvh.len() as u32,
        );
        uniforms.set_frame_number(1);

        let sdf_times = sdfs.iter().map(|s| s.1).collect();
        let sdfs = sdfs.into_iter().map(|s| s.0).collect();

        Self {
            parallelograms,
            triangles,
            sdfs,
            sdf_times,
            materials,
            bvh,
            bvh_inflated,
            uniforms,
        }
    }

    pub(crate) fn scene(&self) -> Scene<'_, BuiltinPalette> {
        Scene {
            uniforms: &self.uniforms,
            parallelograms: ParallelogramsView::new(&self.parallelograms),
            triangles: TrianglesView::new(&self.triangles),
            sdfs: SdfsView::new(&self.sdfs, &self.sdf_times),
            materials: MaterialsView::new(&self.materials),
            atlas_mappings: AtlasMappingsView::new(&[]),
            bvh: BvhView::new(&self.bvh),
            bvh_inflated: BvhView::new(&self.bvh_inflated),
            registry: BuiltinPalette,
        }
    }
}
