use bytemuck::{Pod, Zeroable};
use glam::{vec4, Mat4, Vec2, Vec3, Vec4Swizzles};
use spirv_std::num_traits::Float;

use crate::{HitRecord, Ray};

/// Camera transforms; column 3 of `view` is the camera origin.
///
/// `ray_origin_view` maps the world-space pixel point to the ray origin,
/// which folds perspective cameras (constant origin) and orthographic ones
/// (origin varies per pixel) into a single code path.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Camera {
    pub view: Mat4,
    pub ray_origin_view: Mat4,
}

impl Camera {
    pub const FIELD_OF_VIEW_DEGREES: f32 = 60.0;

    pub fn fov_factor() -> f32 {
        1.0 / (0.5 * Self::FIELD_OF_VIEW_DEGREES.to_radians()).tan()
    }

    pub fn origin(&self) -> Vec3 {
        self.view.w_axis.xyz()
    }

    /// Casts a ray through given pixel; `subpixel` lays in [0, 1)².
    pub fn ray(
        &self,
        pixel: Vec2,
        subpixel: Vec2,
        screen_size: Vec2,
        aspect: f32,
    ) -> Ray {
        let s = aspect * (2.0 * (pixel.x + subpixel.x) / screen_size.x - 1.0);
        let t = -(2.0 * (pixel.y + subpixel.y) / screen_size.y - 1.0);

        let pixel_point = self.origin()
            + (self.view * vec4(s, t, -Self::fov_factor(), 0.0)).xyz();

        let origin = (self.ray_origin_view * pixel_point.extend(1.0)).xyz();

        Ray::new(origin, pixel_point - origin)
    }
}

/// A camera ray together with its one-pixel offset companions; the offsets
/// feed the texture-footprint derivatives at the primary hit.
#[derive(Copy, Clone)]
pub struct PrimaryRay {
    pub ray: Ray,
    pub dx: Ray,
    pub dy: Ray,
}

/// Surface-position derivatives over one screen pixel, evaluated at the
/// primary hit and reused unchanged for deeper bounces.
#[derive(Copy, Clone, Default)]
pub struct RayDifferentials {
    pub dp_dx: Vec3,
    pub dp_dy: Vec3,
}

impl RayDifferentials {
    pub fn none() -> Self {
        Default::default()
    }

    /// Plane-tangent approximation: intersects the offset rays with the
    /// tangent plane of the hit and measures the position deltas.
    pub fn at_primary_hit(dx: &Ray, dy: &Ray, hit: &HitRecord) -> Self {
        Self {
            dp_dx: Self::offset_on_tangent_plane(dx, hit),
            dp_dy: Self::offset_on_tangent_plane(dy, hit),
        }
    }

    fn offset_on_tangent_plane(offset_ray: &Ray, hit: &HitRecord) -> glam::Vec3 {
        let normal = hit.global.normal;
        let denom = offset_ray.direction().dot(normal);

        if denom.abs() < 1e-8 {
            return Default::default();
        }

        let t = (hit.global.position - offset_ray.origin()).dot(normal) / denom;

        offset_ray.origin() + offset_ray.direction() * t - hit.global.position
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec3, Mat4, Vec4};

    use super::*;
    use crate::{HitPlace, MaterialId};

    fn perspective_at_origin() -> Camera {
        // Identity view looking down -Z; every pixel point maps back to the
        // origin.
        Camera {
            view: Mat4::IDENTITY,
            ray_origin_view: Mat4::from_cols(
                Vec4::ZERO,
                Vec4::ZERO,
                Vec4::ZERO,
                vec4(0.0, 0.0, 0.0, 1.0),
            ),
        }
    }

    #[test]
    fn center_pixel_looks_forward() {
        let camera = perspective_at_origin();

        let ray = camera.ray(
            vec2(1.0, 1.0),
            vec2(0.5, 0.5),
            vec2(3.0, 3.0),
            1.0,
        );

        assert_relative_eq!(ray.direction().x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ray.direction().y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(ray.direction().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn screen_y_grows_downward() {
        let camera = perspective_at_origin();

        let top = camera.ray(vec2(1.0, 0.0), vec2(0.5, 0.5), vec2(3.0, 3.0), 1.0);
        let bottom =
            camera.ray(vec2(1.0, 2.0), vec2(0.5, 0.5), vec2(3.0, 3.0), 1.0);

        assert!(top.direction().y > 0.0);
        assert!(bottom.direction().y < 0.0);
    }

    #[test]
    fn differentials_span_one_pixel_on_a_facing_plane() {
        let camera = perspective_at_origin();
        let size = vec2(8.0, 8.0);

        let ray = camera.ray(vec2(4.0, 4.0), vec2(0.5, 0.5), size, 1.0);
        let dx = camera.ray(vec2(5.0, 4.0), vec2(0.5, 0.5), size, 1.0);
        let dy = camera.ray(vec2(4.0, 5.0), vec2(0.5, 0.5), size, 1.0);

        // A plane z = -10, face-on.
        let t = -10.0 / ray.direction().z;

        let hit = HitRecord {
            global: HitPlace {
                position: ray.at(t),
                normal: vec3(0.0, 0.0, 1.0),
            },
            local: Default::default(),
            distance: t,
            material_id: MaterialId::new(0),
            object_uid: 1,
            front_face: true,
        };

        let diff = RayDifferentials::at_primary_hit(&dx, &dy, &hit);

        // One pixel at z = -10 with a 60° vertical fov over 8 pixels.
        let expected = 2.0 * 10.0 / Camera::fov_factor() / 8.0;

        assert_relative_eq!(diff.dp_dx.x, expected, epsilon = 1e-3);
        assert_relative_eq!(diff.dp_dy.y, -expected, epsilon = 1e-3);
    }
}
