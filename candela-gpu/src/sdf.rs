use bytemuck::{Pod, Zeroable};
use glam::{vec3, Mat4, Vec3, Vec4};
use spirv_std::num_traits::Float;

use crate::{HitRecord, MaterialId, Ray, Registry};

/// One placed signed-distance object: a class from the registry plus its
/// object→world transform.
///
/// The inverse transform is precomputed on the CPU; the determinant must not
/// flip basis orientation or the marching breaks.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct SdfInstance {
    /// Rows of the row-major 3×4 object→world transform.
    pub location: [Vec4; 3],

    /// Rows of the row-major 3×4 world→object transform.
    pub inverse_location: [Vec4; 3],

    /// x - ray marching step scale, y - class index (bits),
    /// z - material id (bits), w - object uid (bits)
    pub params: Vec4,
}

impl SdfInstance {
    pub const MAX_MARCHING_STEPS: u32 = 120;

    /// Hit epsilon relative to the traveled distance; keeps grazing rays
    /// from reporting false contacts.
    pub const RELATIVE_EPSILON: f32 = 1e-4;

    pub fn new(
        location: Mat4,
        ray_marching_step_scale: f32,
        class: u32,
        material_id: MaterialId,
        object_uid: u32,
    ) -> Self {
        let inverse = location.inverse();

        Self {
            location: [location.row(0), location.row(1), location.row(2)],
            inverse_location: [inverse.row(0), inverse.row(1), inverse.row(2)],
            params: Vec4::new(
                ray_marching_step_scale,
                f32::from_bits(class),
                f32::from_bits(material_id.get()),
                f32::from_bits(object_uid),
            ),
        }
    }

    pub fn ray_marching_step_scale(&self) -> f32 {
        self.params.x
    }

    pub fn class(&self) -> u32 {
        self.params.y.to_bits()
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.params.z.to_bits())
    }

    pub fn object_uid(&self) -> u32 {
        self.params.w.to_bits()
    }

    pub fn to_local(&self, point: Vec3) -> Vec3 {
        transform_point(&self.inverse_location, point)
    }

    pub fn to_world(&self, point: Vec3) -> Vec3 {
        transform_point(&self.location, point)
    }

    /// Sphere-traces the ray in the object's local frame.
    #[must_use]
    pub fn hit<R: Registry>(
        &self,
        registry: &R,
        ray: &Ray,
        tmin: f32,
        tmax: f32,
        time: f32,
        hit: &mut HitRecord,
    ) -> bool {
        let local_origin = self.to_local(ray.origin());

        let local_direction =
            transform_vector(&self.inverse_location, ray.direction())
                .normalize();

        let local_tmin =
            (self.to_local(ray.at(tmin)) - local_origin).length();

        let local_tmax = if tmax < f32::MAX {
            (self.to_local(ray.at(tmax)) - local_origin).length()
        } else {
            f32::MAX
        };

        let class = self.class();
        let step_scale = self.ray_marching_step_scale();

        let mut t = local_tmin;
        let mut converged = false;
        let mut step = 0;

        while step < Self::MAX_MARCHING_STEPS && t <= local_tmax {
            let sample = registry.sdf_distance(
                class,
                local_origin + local_direction * t,
                time,
            );

            let epsilon = Self::RELATIVE_EPSILON * t;

            if sample.abs() < epsilon {
                converged = true;
                break;
            }

            t += (sample.abs() * step_scale).max(epsilon);
            step += 1;
        }

        if !converged {
            return false;
        }

        let candidate = local_origin + local_direction * t;
        let global_position = self.to_world(candidate);
        let distance = (global_position - ray.origin()).length();

        if distance <= tmin || distance >= tmax {
            return false;
        }

        let mut local_normal = gradient(registry, class, candidate, time);

        let mut global_normal =
            transform_transposed_vector(&self.inverse_location, local_normal)
                .normalize();

        let front_face =
            registry.sdf_distance(class, local_origin, time) >= 0.0;

        if !front_face {
            local_normal = -local_normal;
            global_normal = -global_normal;
        }

        hit.global.position = global_position;
        hit.global.normal = global_normal;
        hit.local.position = registry.sdf_rest_position(class, candidate, time);
        hit.local.normal = local_normal;
        hit.distance = distance;
        hit.material_id = self.material_id();
        hit.object_uid = self.object_uid();
        hit.front_face = front_face;

        true
    }

    /// World-space signed distance from `point` measured along `direction`;
    /// drives the shadow/occlusion field sampling.
    pub fn signed_distance_along<R: Registry>(
        &self,
        registry: &R,
        point: Vec3,
        direction: Vec3,
        time: f32,
    ) -> f32 {
        let local_point = self.to_local(point);

        let local_distance =
            registry.sdf_distance(self.class(), local_point, time);

        let local_direction =
            transform_vector(&self.inverse_location, direction).normalize();

        let probe =
            self.to_world(local_point + local_direction * local_distance);

        let delta = probe - point;
        let sign = if direction.dot(delta) >= 0.0 { 1.0 } else { -1.0 };

        delta.length() * sign
    }
}

fn transform_point(rows: &[Vec4; 3], point: Vec3) -> Vec3 {
    let homogeneous = point.extend(1.0);

    vec3(
        rows[0].dot(homogeneous),
        rows[1].dot(homogeneous),
        rows[2].dot(homogeneous),
    )
}

fn transform_vector(rows: &[Vec4; 3], vector: Vec3) -> Vec3 {
    let homogeneous = vector.extend(0.0);

    vec3(
        rows[0].dot(homogeneous),
        rows[1].dot(homogeneous),
        rows[2].dot(homogeneous),
    )
}

/// Applies the transpose of the 3×3 part; normals transform through the
/// transposed inverse.
fn transform_transposed_vector(rows: &[Vec4; 3], vector: Vec3) -> Vec3 {
    vec3(
        rows[0].x * vector.x + rows[1].x * vector.y + rows[2].x * vector.z,
        rows[0].y * vector.x + rows[1].y * vector.y + rows[2].y * vector.z,
        rows[0].z * vector.x + rows[1].z * vector.y + rows[2].z * vector.z,
    )
}

/// Tetrahedral-offset gradient of the field at `point`.
fn gradient<R: Registry>(
    registry: &R,
    class: u32,
    point: Vec3,
    time: f32,
) -> Vec3 {
    const E: f32 = 0.5773 * 5e-4;

    let k0 = vec3(1.0, -1.0, -1.0);
    let k1 = vec3(-1.0, -1.0, 1.0);
    let k2 = vec3(-1.0, 1.0, -1.0);
    let k3 = vec3(1.0, 1.0, 1.0);

    (k0 * registry.sdf_distance(class, point + k0 * E, time)
        + k1 * registry.sdf_distance(class, point + k1 * E, time)
        + k2 * registry.sdf_distance(class, point + k2 * E, time)
        + k3 * registry.sdf_distance(class, point + k3 * E, time))
        .normalize()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Mat4;

    use super::*;
    use crate::{BuiltinPalette, SDF_CLASS_BOX, SDF_CLASS_SPHERE};

    fn scaled_box() -> SdfInstance {
        SdfInstance::new(
            Mat4::from_scale(vec3(1.0, 2.0, 3.0)),
            1.0,
            SDF_CLASS_BOX,
            MaterialId::new(4),
            7,
        )
    }

    #[test]
    fn marching_converges_onto_the_surface() {
        let palette = BuiltinPalette;
        let sphere = SdfInstance::new(
            Mat4::from_translation(vec3(0.0, 0.0, -5.0)),
            1.0,
            SDF_CLASS_SPHERE,
            MaterialId::new(0),
            1,
        );

        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        let mut hit = HitRecord::none();

        assert!(sphere.hit(&palette, &ray, 1e-6, f32::MAX, 0.0, &mut hit));
        assert_relative_eq!(hit.distance, 4.0, epsilon = 1e-3);

        // Re-sampling the field at the reported hit stays within the
        // relative epsilon.
        let local = sphere.to_local(hit.global.position);
        let residual = palette.sdf_distance(SDF_CLASS_SPHERE, local, 0.0);
        assert!(residual.abs() < SdfInstance::RELATIVE_EPSILON * hit.distance);

        assert!(hit.front_face);
        assert_relative_eq!(hit.global.normal.z, 1.0, epsilon = 1e-2);
        assert_eq!(hit.object_uid, 1);
    }

    #[test]
    fn normals_survive_non_uniform_scaling() {
        let palette = BuiltinPalette;
        let instance = scaled_box();

        // Surface point on the +Y face: local (0, 1, 0), world (0, 2, 0).
        let ray = Ray::new(vec3(0.0, 5.0, 0.0), vec3(0.0, -1.0, 0.0));
        let mut hit = HitRecord::none();

        assert!(instance.hit(&palette, &ray, 1e-6, f32::MAX, 0.0, &mut hit));
        assert_relative_eq!(hit.global.position.y, 2.0, epsilon = 1e-2);
        assert_relative_eq!(hit.global.normal.y, 1.0, epsilon = 1e-2);
    }

    #[test]
    fn interior_origins_flip_the_normal() {
        let palette = BuiltinPalette;
        let instance = scaled_box();

        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 1.0, 0.0));
        let mut hit = HitRecord::none();

        assert!(instance.hit(&palette, &ray, 1e-6, f32::MAX, 0.0, &mut hit));
        assert!(!hit.front_face);
        assert!(hit.global.normal.y < 0.0);
    }

    #[test]
    fn exhausted_budget_counts_as_a_miss() {
        let palette = BuiltinPalette;
        let sphere = SdfInstance::new(
            Mat4::from_translation(vec3(0.0, 0.0, -5.0)),
            1.0,
            SDF_CLASS_SPHERE,
            MaterialId::new(0),
            1,
        );

        // Pointing away from the surface.
        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, 1.0));
        let mut hit = HitRecord::none();

        assert!(!sphere.hit(&palette, &ray, 1e-6, f32::MAX, 0.0, &mut hit));
    }

    #[test]
    fn directional_distance_is_signed_by_the_probe_direction() {
        let palette = BuiltinPalette;
        let sphere = SdfInstance::new(
            Mat4::IDENTITY,
            1.0,
            SDF_CLASS_SPHERE,
            MaterialId::new(0),
            1,
        );

        // One unit of free space in front of an exterior point.
        let outside = sphere.signed_distance_along(
            &palette,
            vec3(0.0, 2.0, 0.0),
            vec3(0.0, -1.0, 0.0),
            0.0,
        );

        assert_relative_eq!(outside, 1.0, epsilon = 1e-5);

        // Interior points probe backward, so the estimate goes negative.
        let inside = sphere.signed_distance_along(
            &palette,
            vec3(0.0, 0.5, 0.0),
            vec3(0.0, 1.0, 0.0),
            0.0,
        );

        assert_relative_eq!(inside, -0.5, epsilon = 1e-5);
    }
}
