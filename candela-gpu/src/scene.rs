use glam::Vec3;

use crate::{
    AtlasMappingsView, BvhNode, BvhView, MaterialsView, ParallelogramsView,
    Registry, SdfsView, TrianglesView, Uniforms,
};

/// Everything a single invocation needs to intersect and shade: the frame
/// uniforms, the geometry views, and the registry of scene callables.
#[derive(Clone, Copy)]
pub struct Scene<'a, R> {
    pub uniforms: &'a Uniforms,
    pub parallelograms: ParallelogramsView<'a>,
    pub triangles: TrianglesView<'a>,
    pub sdfs: SdfsView<'a>,
    pub materials: MaterialsView<'a>,
    pub atlas_mappings: AtlasMappingsView<'a>,
    pub bvh: BvhView<'a>,
    pub bvh_inflated: BvhView<'a>,
    pub registry: R,
}

impl<'a, R> Scene<'a, R>
where
    R: Registry,
{
    /// Index of the first emissive quad; -1 when the scene has none.
    pub fn emissive_quad(&self) -> i32 {
        let count = self.uniforms.parallelogram_count();
        let mut index = 0;

        while index < count {
            let quad = self.parallelograms.get(index);

            if self.materials.get(quad.material_id()).is_emissive() {
                return index as i32;
            }

            index += 1;
        }

        -1
    }

    /// Minimum directional signed distance around `point`, gathered from the
    /// sdf leaves of the inflated hierarchy that contain it.
    ///
    /// Triangle leaves are inert here; `f32::MAX` means free space.
    pub fn signed_distance(&self, point: Vec3, direction: Vec3) -> f32 {
        let length = self.uniforms.bvh_length();
        let mut nearest = f32::MAX;
        let mut ptr = 0;
        let mut follows = 0;

        while ptr < length && follows <= length {
            follows += 1;

            let node = self.bvh_inflated.get(ptr);

            if node.contains(point) {
                if node.primitive_kind() == BvhNode::PRIMITIVE_SDF {
                    let index = node.primitive_index();

                    let estimate = self.sdfs.get(index).signed_distance_along(
                        &self.registry,
                        point,
                        direction,
                        self.sdfs.time(index),
                    );

                    nearest = nearest.min(estimate);
                }

                ptr += 1;
            } else {
                let link = node.miss_link();

                if link < 0 {
                    break;
                }

                ptr = link as u32;
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use std::vec;
    use std::vec::Vec;

    use glam::vec3;

    use crate::testing::SceneData;
    use crate::{Material, MaterialClass, MaterialId, Parallelogram};

    #[test]
    fn the_first_emissive_quad_wins() {
        let quad = |material| {
            Parallelogram::new(
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
                MaterialId::new(material),
                1,
            )
        };

        let data = SceneData::new(
            vec![quad(0), quad(1), quad(1)],
            Vec::new(),
            Vec::new(),
            vec![
                Material::new(MaterialClass::Lambertian),
                Material::new(MaterialClass::Lambertian)
                    .with_emission(1.0, 1.0, 1.0),
            ],
        );

        assert_eq!(data.scene().emissive_quad(), 1);
    }

    #[test]
    fn scenes_without_lights_report_none() {
        let data = SceneData::new(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );

        assert_eq!(data.scene().emissive_quad(), -1);
    }
}
