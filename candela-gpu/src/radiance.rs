use glam::{vec2, vec3, Vec2, Vec3};
use spirv_std::Sampler;
use spirv_std::num_traits::Float;

use crate::{
    lambertian_pdf, position_hash, HitRecord, Material, MaterialClass, Noise,
    PrimaryRay, Ray, RayDifferentials, Registry, Scene, Tex, Vec3Ext,
};

pub const BACKGROUND_COLOR: Vec3 = Vec3::new(0.1, 0.1, 0.1);

/// Chance per diffuse bounce of steering the next ray at the emissive quad
/// instead of the cosine lobe; the density blends accordingly.
const LIGHT_SAMPLE_PROBABILITY: f32 = 0.2;

const MAX_BOUNCES_STOCHASTIC: u32 = 50;
const MAX_BOUNCES_ANALYTIC: u32 = 8;

/// One stochastic path: importance-sampled bounces, Russian roulette from
/// the third bounce, radiance gathered from emissive front faces and the
/// background.
pub fn trace_monte_carlo<R>(
    scene: &Scene<R>,
    atlas_tex: Tex,
    atlas_sampler: &Sampler,
    primary: &PrimaryRay,
    noise: &mut Noise,
) -> Vec3
where
    R: Registry,
{
    let mut ray = primary.ray;
    let mut throughput = Vec3::ONE;
    let mut radiance = Vec3::ZERO;
    let mut differentials = RayDifferentials::none();
    let mut hit = HitRecord::none();
    let mut bounce = 0;

    while bounce < MAX_BOUNCES_STOCHASTIC {
        if !ray.trace_nearest(scene, &mut hit) {
            radiance += BACKGROUND_COLOR * throughput;
            break;
        }

        if bounce == 0 {
            differentials = RayDifferentials::at_primary_hit(
                &primary.dx,
                &primary.dy,
                &hit,
            );
        }

        let material = scene.materials.get(hit.material_id);

        let albedo = material.albedo(
            &scene.registry,
            atlas_tex,
            atlas_sampler,
            scene.atlas_mappings,
            &hit.local,
            scene.uniforms.time(),
            &differentials,
        );

        let emission = if hit.front_face {
            material.emission_color()
        } else {
            Vec3::ZERO
        };

        radiance += emission * throughput;

        let scatter = material.scatter(&ray, &hit, noise);

        if scatter.skip_pdf {
            throughput *=
                albedo.lerp(material.specular_color(), scatter.specular_weight);
            ray = scatter.ray.nudged();
        } else {
            let mut next_ray = scatter.ray;
            let cosine_pdf;
            let pdf;

            let light_index = scene.emissive_quad();

            if light_index >= 0 {
                let light = scene.parallelograms.get(light_index as u32);

                if noise.sample() < LIGHT_SAMPLE_PROBABILITY {
                    next_ray = Ray::new(
                        hit.global.position,
                        light.sample_point(noise) - hit.global.position,
                    );
                }

                cosine_pdf =
                    lambertian_pdf(hit.global.normal, next_ray.direction());

                pdf = LIGHT_SAMPLE_PROBABILITY * light.pdf(&next_ray)
                    + (1.0 - LIGHT_SAMPLE_PROBABILITY) * cosine_pdf;
            } else {
                cosine_pdf =
                    lambertian_pdf(hit.global.normal, next_ray.direction());
                pdf = cosine_pdf;
            }

            if pdf <= 1e-5 {
                break;
            }

            throughput *= cosine_pdf
                * albedo
                    .lerp(material.specular_color(), scatter.specular_weight)
                / pdf;

            ray = next_ray.nudged();
        }

        if bounce > 2 {
            let survival = throughput.max_element();

            if noise.sample() > survival {
                break;
            }

            throughput /= survival;
        }

        bounce += 1;
    }

    radiance
}

/// One analytic path: Lambert surfaces get direct lighting with hard shadows
/// and sdf ambient occlusion, mirrors keep bouncing with a position-hashed
/// roughness jitter, glass always refracts.
pub fn trace_deterministic<R>(
    scene: &Scene<R>,
    atlas_tex: Tex,
    atlas_sampler: &Sampler,
    primary: &PrimaryRay,
    pixel: Vec2,
) -> Vec3
where
    R: Registry,
{
    let mut ray = primary.ray;
    let mut tint = Vec3::ONE;
    let mut differentials = RayDifferentials::none();
    let mut hit = HitRecord::none();
    let mut bounce = 0;

    while bounce < MAX_BOUNCES_ANALYTIC {
        if !ray.trace_nearest(scene, &mut hit) {
            return tint * BACKGROUND_COLOR;
        }

        if bounce == 0 {
            differentials = RayDifferentials::at_primary_hit(
                &primary.dx,
                &primary.dy,
                &hit,
            );
        }

        let material = scene.materials.get(hit.material_id);

        let albedo = material.albedo(
            &scene.registry,
            atlas_tex,
            atlas_sampler,
            scene.atlas_mappings,
            &hit.local,
            scene.uniforms.time(),
            &differentials,
        );

        match material.class() {
            MaterialClass::Lambertian => {
                return tint
                    * direct_lighting(scene, &ray, &hit, &material, albedo);
            }

            MaterialClass::Mirror => {
                let seed = pixel + vec2(17.0, 59.0) * (bounce as f32);

                let jitter = vec3(
                    position_hash(seed),
                    position_hash(seed + vec2(5.0, 11.0)),
                    position_hash(seed + vec2(23.0, 2.0)),
                ) * 2.0
                    - 1.0;

                let direction = (ray.direction().reflect(hit.global.normal)
                    + material.roughness() * jitter)
                    .normalize();

                tint *= material.specular_color();
                ray = Ray::new(hit.global.position, direction).nudged();
            }

            MaterialClass::Glass => {
                tint *= albedo;
                ray = material.scatter_glass_deterministic(&ray, &hit).ray.nudged();
            }

            MaterialClass::Isotropic => {
                return tint * albedo;
            }
        }

        bounce += 1;
    }

    tint * BACKGROUND_COLOR
}

fn direct_lighting<R>(
    scene: &Scene<R>,
    ray: &Ray,
    hit: &HitRecord,
    material: &Material,
    albedo: Vec3,
) -> Vec3
where
    R: Registry,
{
    let normal = hit.global.normal;
    let position = hit.global.position;
    let occlusion = ambient_occlusion(scene, position, normal);

    let mut color =
        BACKGROUND_COLOR * albedo * occlusion + material.emission_color();

    let light_index = scene.emissive_quad();

    if light_index >= 0 {
        let light = scene.parallelograms.get(light_index as u32);
        let light_material = scene.materials.get(light.material_id());

        let to_light = light.center() - position;
        let light_direction = to_light.normalize();

        let diffuse = normal.dot(light_direction).max(0.0);

        let specular = (-light_direction)
            .reflect(normal)
            .dot(-ray.direction())
            .max(0.0)
            .powf(4.0)
            * diffuse;

        let shadow =
            shadow_factor(scene, position, light_direction, to_light.length());

        let lit = (albedo * diffuse * occlusion).lerp(
            material.specular_color() * specular,
            material.specular_strength(),
        );

        color += lit
            * light_material.emission_color()
            * (shadow * 0.4 + 0.6);
    }

    color
}

/// 1 when the path from `position` to the light is clear; emissive blockers
/// count as clear, so the light never shadows itself.
fn shadow_factor<R>(
    scene: &Scene<R>,
    position: Vec3,
    direction: Vec3,
    light_distance: f32,
) -> f32
where
    R: Registry,
{
    let ray = Ray::new(position + direction * Ray::NUDGE_OFFSET, direction);
    let mut hit = HitRecord::none();

    if !ray.trace_nearest(scene, &mut hit) {
        return 1.0;
    }

    if hit.distance >= light_distance - 1e-3 {
        return 1.0;
    }

    if scene.materials.get(hit.material_id).is_emissive() {
        return 1.0;
    }

    0.0
}

/// Screen-space-free ambient occlusion: five probes of the directional sdf
/// field along the normal, decaying with height.
pub fn ambient_occlusion<R>(
    scene: &Scene<R>,
    position: Vec3,
    normal: Vec3,
) -> f32
where
    R: Registry,
{
    let mut accumulated = 0.0f32;
    let mut decay = 1.0f32;
    let mut i = 0;

    while i < 5 {
        let height = 0.01 + 0.12 * (i as f32) / 4.0;

        let distance =
            scene.signed_distance(position + normal * height, normal);

        accumulated += (height - distance).max(0.0) * decay;
        decay *= 0.95;

        if accumulated > 0.35 {
            break;
        }

        i += 1;
    }

    (2.5 - 7.0 * accumulated).clamp(0.0, 1.0)
}
