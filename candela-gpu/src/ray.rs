use glam::Vec3;
use spirv_std::num_traits::Float;

use crate::{BvhNode, HitRecord, Registry, Scene};

#[derive(Copy, Clone, Default)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    inv_direction: Vec3,
}

impl Ray {
    /// Lower bound of every hit interval.
    pub const MIN_HIT_DISTANCE: f32 = 1e-6;

    /// How far a spawned ray moves along its direction before tracing, to
    /// avoid re-hitting the surface it left.
    pub const NUDGE_OFFSET: f32 = 5e-4;

    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize();

        Self {
            origin,
            direction,
            inv_direction: 1.0 / direction,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn nudged(&self) -> Self {
        Self {
            origin: self.origin + self.direction * Self::NUDGE_OFFSET,
            ..*self
        }
    }

    /// Finds the nearest hit: the parallelogram array is scanned linearly,
    /// triangles and sdf instances go through the skip-link hierarchy.
    ///
    /// The walk is stackless: an AABB hit falls through to `index + 1`, a
    /// miss jumps to the stored link, -1 (or a link outside the array)
    /// terminates.
    #[must_use]
    pub fn trace_nearest<R>(
        &self,
        scene: &Scene<R>,
        hit: &mut HitRecord,
    ) -> bool
    where
        R: Registry,
    {
        *hit = HitRecord::none();

        let mut closest_so_far = f32::MAX;

        let quad_count = scene.uniforms.parallelogram_count();
        let mut quad = 0;

        while quad < quad_count {
            let found = scene.parallelograms.get(quad).hit(
                self,
                Self::MIN_HIT_DISTANCE,
                closest_so_far,
                hit,
            );

            if found {
                closest_so_far = hit.distance;
            }

            quad += 1;
        }

        let bvh_length = scene.uniforms.bvh_length();
        let mut ptr = 0;
        let mut follows = 0;

        while ptr < bvh_length && follows <= bvh_length {
            follows += 1;

            let node = scene.bvh.get(ptr);

            let (entered, entry_distance) =
                node.hit(self, Self::MIN_HIT_DISTANCE, closest_so_far);

            if entered {
                let kind = node.primitive_kind();

                if kind == BvhNode::PRIMITIVE_TRIANGLE {
                    let found = scene.triangles.get(node.primitive_index()).hit(
                        self,
                        Self::MIN_HIT_DISTANCE,
                        closest_so_far,
                        hit,
                    );

                    if found {
                        closest_so_far = hit.distance;
                    }
                } else if kind == BvhNode::PRIMITIVE_SDF {
                    let index = node.primitive_index();

                    let found = scene.sdfs.get(index).hit(
                        &scene.registry,
                        self,
                        entry_distance.max(Self::MIN_HIT_DISTANCE),
                        closest_so_far,
                        scene.sdfs.time(index),
                        hit,
                    );

                    if found {
                        closest_so_far = hit.distance;
                    }
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

        hit.is_some()
    }
}
