use core::f32::consts::PI;

use glam::{vec3, Vec3};
use spirv_std::num_traits::Float;

use crate::{HitRecord, Material, MaterialClass, Noise, Ray, Vec3Ext};

/// Orthonormal basis with `w` as the chosen +Z axis.
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    pub fn from_w(w: Vec3) -> Self {
        let a = if w.x.abs() > 0.9 {
            vec3(0.0, 1.0, 0.0)
        } else {
            vec3(1.0, 0.0, 0.0)
        };

        let v = w.cross(a).normalize();
        let u = w.cross(v);

        Self { u, v, w }
    }

    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}

/// Where a surface interaction sends the path next.
///
/// `skip_pdf` marks delta-ish lobes (mirror, glass, specular Lambert,
/// isotropic): the integrator takes `ray` as-is instead of density-weighting
/// it. `specular_weight` picks between albedo and specular tint when the
/// throughput is updated.
#[derive(Copy, Clone)]
pub struct ScatterRecord {
    pub ray: Ray,
    pub skip_pdf: bool,
    pub specular_weight: f32,
}

/// Cosine-lobe density of `direction` around `normal`.
pub fn lambertian_pdf(normal: Vec3, direction: Vec3) -> f32 {
    normal.dot(direction).max(0.0) / PI
}

impl Material {
    pub fn scatter(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        noise: &mut Noise,
    ) -> ScatterRecord {
        match self.class() {
            MaterialClass::Lambertian => {
                self.scatter_lambertian(ray, hit, noise)
            }
            MaterialClass::Mirror => self.scatter_mirror(ray, hit, noise),
            MaterialClass::Glass => {
                self.glass_record(ray, hit, noise.sample())
            }
            MaterialClass::Isotropic => {
                self.scatter_isotropic(ray, hit, noise)
            }
        }
    }

    /// Glass without the Fresnel lottery; the analytic pass refracts
    /// whenever refraction is possible at all.
    pub fn scatter_glass_deterministic(
        &self,
        ray: &Ray,
        hit: &HitRecord,
    ) -> ScatterRecord {
        self.glass_record(ray, hit, 1.0)
    }

    fn scatter_lambertian(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        noise: &mut Noise,
    ) -> ScatterRecord {
        let basis = Onb::from_w(hit.global.normal);
        let diffuse = basis.local(noise.sample_cosine_direction());

        if noise.sample() < self.specular_strength() {
            let direction = ray
                .direction()
                .reflect(hit.global.normal)
                .lerp(diffuse, self.roughness())
                .normalize();

            ScatterRecord {
                ray: Ray::new(hit.global.position, direction),
                skip_pdf: true,
                specular_weight: 1.0,
            }
        } else {
            ScatterRecord {
                ray: Ray::new(hit.global.position, diffuse),
                skip_pdf: false,
                specular_weight: 0.0,
            }
        }
    }

    fn scatter_mirror(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        noise: &mut Noise,
    ) -> ScatterRecord {
        let direction = (ray.direction().reflect(hit.global.normal)
            + self.roughness() * noise.sample_in_sphere())
        .normalize();

        ScatterRecord {
            ray: Ray::new(hit.global.position, direction),
            skip_pdf: true,
            specular_weight: 1.0,
        }
    }

    /// `reflectance_draw` below the Schlick reflectance picks reflection;
    /// passing 1.0 only ever reflects on total internal reflection.
    fn glass_record(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        reflectance_draw: f32,
    ) -> ScatterRecord {
        let normal = hit.global.normal;

        let eta = if hit.front_face {
            1.0 / self.refractive_index()
        } else {
            self.refractive_index()
        };

        let cos_theta = (-ray.direction()).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        let cannot_refract = eta * sin_theta > 1.0;

        let direction =
            if cannot_refract || reflectance_draw < schlick(cos_theta, eta) {
                ray.direction().reflect(normal)
            } else {
                ray.direction().refract(normal, eta)
            };

        let direction = if direction.near_zero() {
            normal
        } else {
            direction
        };

        ScatterRecord {
            ray: Ray::new(hit.global.position, direction),
            skip_pdf: true,
            specular_weight: 0.0,
        }
    }

    /// Henyey-Greenstein phase function with `g = specular_strength`.
    fn scatter_isotropic(
        &self,
        ray: &Ray,
        hit: &HitRecord,
        noise: &mut Noise,
    ) -> ScatterRecord {
        let g = self.specular_strength();
        let r = noise.sample();

        let cos_theta = if g.abs() < 1e-3 {
            1.0 - 2.0 * r
        } else {
            let s = (1.0 - g * g) / (1.0 - g + 2.0 * g * r);

            (1.0 + g * g - s * s) / (2.0 * g)
        };

        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let phi = 2.0 * PI * noise.sample();
        let basis = Onb::from_w(ray.direction());

        let direction = basis.local(vec3(
            phi.cos() * sin_theta,
            phi.sin() * sin_theta,
            cos_theta,
        ));

        ScatterRecord {
            ray: Ray::new(hit.global.position, direction),
            skip_pdf: true,
            specular_weight: 0.0,
        }
    }
}

fn schlick(cos_theta: f32, eta: f32) -> f32 {
    let r0 = (1.0 - eta) / (1.0 + eta);
    let r0 = r0 * r0;

    r0 + (1.0 - r0) * (1.0 - cos_theta).powf(5.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;
    use crate::{HitPlace, MaterialId};

    fn hit_at(position: Vec3, normal: Vec3, front_face: bool) -> HitRecord {
        HitRecord {
            global: HitPlace { position, normal },
            local: HitPlace { position, normal },
            distance: 1.0,
            material_id: MaterialId::new(0),
            object_uid: 1,
            front_face,
        }
    }

    #[test]
    fn perfect_mirror_reflects_exactly() {
        let material =
            Material::new(MaterialClass::Mirror).with_roughness(0.0);

        let incoming = Ray::new(
            vec3(-1.0, 1.0, 0.0),
            vec3(1.0, -1.0, 0.0),
        );

        let hit = hit_at(Vec3::ZERO, vec3(0.0, 1.0, 0.0), true);
        let mut noise = Noise::new(0, 0);

        let scatter = material.scatter(&incoming, &hit, &mut noise);
        let expected = vec3(1.0, 1.0, 0.0).normalize();

        assert!(scatter.skip_pdf);

        // Within 1e-4 radians of the analytic reflection.
        assert!(scatter.ray.direction().dot(expected) > (1e-4f32).cos());
    }

    #[test]
    fn glass_refracts_at_seventy_degrees() {
        let material =
            Material::new(MaterialClass::Glass).with_refractive_index(1.5);

        let angle = 70f32.to_radians();
        let direction = vec3(angle.sin(), -angle.cos(), 0.0);
        let incoming = Ray::new(vec3(0.0, 1.0, 0.0), direction);
        let hit = hit_at(Vec3::ZERO, vec3(0.0, 1.0, 0.0), true);

        let scatter = material.scatter_glass_deterministic(&incoming, &hit);

        // Refracted: continues below the surface.
        assert!(scatter.ray.direction().y < 0.0);

        // Snell's law.
        assert_relative_eq!(
            scatter.ray.direction().x,
            angle.sin() / 1.5,
            epsilon = 1e-4
        );
    }

    #[test]
    fn glass_reflects_totally_from_the_inside() {
        let material =
            Material::new(MaterialClass::Glass).with_refractive_index(1.5);

        // Leaving the medium at 50°: 1.5 · sin 50° > 1.
        let angle = 50f32.to_radians();
        let direction = vec3(angle.sin(), -angle.cos(), 0.0);
        let incoming = Ray::new(vec3(0.0, 1.0, 0.0), direction);
        let hit = hit_at(Vec3::ZERO, vec3(0.0, 1.0, 0.0), false);

        let scatter = material.scatter_glass_deterministic(&incoming, &hit);

        // Reflected: bounces back above the surface.
        assert!(scatter.ray.direction().y > 0.0);
        assert_relative_eq!(
            scatter.ray.direction().x,
            angle.sin(),
            epsilon = 1e-4
        );
    }

    #[test]
    fn lambertian_diffuse_stays_in_the_upper_hemisphere() {
        let material = Material::new(MaterialClass::Lambertian)
            .with_albedo(0.5, 0.5, 0.5);

        let incoming = Ray::new(vec3(0.0, 1.0, 0.0), vec3(0.0, -1.0, 0.0));
        let hit = hit_at(Vec3::ZERO, vec3(0.0, 1.0, 0.0), true);
        let mut noise = Noise::new(3, 1);

        for _ in 0..64 {
            let scatter = material.scatter(&incoming, &hit, &mut noise);

            assert!(!scatter.skip_pdf);
            assert!(scatter.ray.direction().y >= 0.0);
        }
    }

    #[test]
    fn full_specular_strength_always_marks_specular() {
        let material = Material::new(MaterialClass::Lambertian)
            .with_specular_strength(1.0)
            .with_roughness(0.0);

        let incoming =
            Ray::new(vec3(-1.0, 1.0, 0.0), vec3(1.0, -1.0, 0.0));
        let hit = hit_at(Vec3::ZERO, vec3(0.0, 1.0, 0.0), true);
        let mut noise = Noise::new(3, 2);

        let scatter = material.scatter(&incoming, &hit, &mut noise);

        assert!(scatter.skip_pdf);
        assert_relative_eq!(scatter.specular_weight, 1.0);

        // Zero roughness snaps onto the perfect reflection.
        let expected = vec3(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(
            scatter.ray.direction().dot(expected),
            1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn phase_function_leans_forward_with_positive_g() {
        let material = Material::new(MaterialClass::Isotropic)
            .with_specular_strength(0.8);

        let incoming = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        let hit = hit_at(vec3(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0), true);
        let mut noise = Noise::new(11, 4);

        let mut forward = 0;

        for _ in 0..256 {
            let scatter = material.scatter(&incoming, &hit, &mut noise);
            let cosine = scatter.ray.direction().dot(incoming.direction());

            assert!(cosine >= -1.0 - 1e-5 && cosine <= 1.0 + 1e-5);

            if cosine > 0.0 {
                forward += 1;
            }
        }

        assert!(forward > 192, "forward-scattered only {forward}/256");
    }

    #[test]
    fn lambertian_pdf_is_the_projected_cosine() {
        let normal = vec3(0.0, 1.0, 0.0);

        assert_relative_eq!(
            lambertian_pdf(normal, normal),
            1.0 / PI,
            epsilon = 1e-6
        );
        assert_eq!(lambertian_pdf(normal, vec3(0.0, -1.0, 0.0)), 0.0);
    }
}
