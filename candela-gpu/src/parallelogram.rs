use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use spirv_std::num_traits::Float;

use crate::{HitRecord, MaterialId, Noise, Ray};

/// One-sided quad `Q + α·u + β·v`, α, β ∈ [0, 1].
///
/// The plane constant and the `w` vector are precomputed on the CPU; `w`
/// recovers the planar barycentrics of a hit point.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Parallelogram {
    /// x, y, z - origin Q, w - object uid (bits)
    pub d0: Vec4,

    /// x, y, z - side u, w - material id (bits)
    pub d1: Vec4,

    /// x, y, z - side v, w - plane constant D
    pub d2: Vec4,

    /// x, y, z - unit plane normal
    pub d3: Vec4,

    /// x, y, z - w vector, `(u × v) / ‖u × v‖²`
    pub d4: Vec4,
}

impl Parallelogram {
    pub fn new(
        origin: Vec3,
        u: Vec3,
        v: Vec3,
        material_id: MaterialId,
        object_uid: u32,
    ) -> Self {
        let orth = u.cross(v);
        let normal = orth.normalize();
        let w = orth / orth.dot(orth);

        Self {
            d0: origin.extend(f32::from_bits(object_uid)),
            d1: u.extend(f32::from_bits(material_id.get())),
            d2: v.extend(normal.dot(origin)),
            d3: normal.extend(0.0),
            d4: w.extend(0.0),
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.d0.truncate()
    }

    pub fn object_uid(&self) -> u32 {
        self.d0.w.to_bits()
    }

    pub fn side_u(&self) -> Vec3 {
        self.d1.truncate()
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d1.w.to_bits())
    }

    pub fn side_v(&self) -> Vec3 {
        self.d2.truncate()
    }

    pub fn plane_constant(&self) -> f32 {
        self.d2.w
    }

    pub fn normal(&self) -> Vec3 {
        self.d3.truncate()
    }

    pub fn w_vector(&self) -> Vec3 {
        self.d4.truncate()
    }

    pub fn center(&self) -> Vec3 {
        self.origin() + 0.5 * (self.side_u() + self.side_v())
    }

    pub fn area(&self) -> f32 {
        self.side_u().cross(self.side_v()).length()
    }

    #[must_use]
    pub fn hit(
        &self,
        ray: &Ray,
        tmin: f32,
        tmax: f32,
        hit: &mut HitRecord,
    ) -> bool {
        let normal = self.normal();
        let denom = ray.direction().dot(normal);

        // One-sided: grazing and back-facing rays miss.
        if denom >= 0.0 || denom.abs() < 1e-8 {
            return false;
        }

        let t = (self.plane_constant() - normal.dot(ray.origin())) / denom;

        if t <= tmin || t >= tmax {
            return false;
        }

        let planar = ray.at(t) - self.origin();
        let w = self.w_vector();
        let alpha = w.dot(planar.cross(self.side_v()));
        let beta = w.dot(self.side_u().cross(planar));

        if alpha < 0.0 || alpha > 1.0 || beta < 0.0 || beta > 1.0 {
            return false;
        }

        let span = alpha * self.side_u() + beta * self.side_v();

        hit.global.position = self.origin() + span;
        hit.global.normal = normal;
        // Center the local frame so quads share the texturing convention of
        // the SDF instances.
        hit.local.position = span - 0.5 * (self.side_u() + self.side_v());
        hit.local.normal = normal;
        hit.distance = t;
        hit.material_id = self.material_id();
        hit.object_uid = self.object_uid();
        hit.front_face = denom < 0.0;

        true
    }

    /// Picks a uniform point on the quad's surface.
    pub fn sample_point(&self, noise: &mut Noise) -> Vec3 {
        self.origin()
            + noise.sample() * self.side_u()
            + noise.sample() * self.side_v()
    }

    /// Solid-angle density of reaching this quad along `ray`; used when the
    /// integrator importance-samples the light.
    pub fn pdf(&self, ray: &Ray) -> f32 {
        let normal = self.normal();
        let direction = ray.direction();
        let denom = direction.dot(normal);

        if denom > 0.0 {
            return 0.0;
        }

        if denom == 0.0 {
            return f32::MIN_POSITIVE;
        }

        let t = (self.plane_constant() - normal.dot(ray.origin())) / denom;

        if t <= Ray::MIN_HIT_DISTANCE {
            return f32::MIN_POSITIVE;
        }

        let planar = ray.at(t) - self.origin();
        let w = self.w_vector();
        let alpha = w.dot(planar.cross(self.side_v()));
        let beta = w.dot(self.side_u().cross(planar));

        if alpha < 0.0 || alpha > 1.0 || beta < 0.0 || beta > 1.0 {
            return f32::MIN_POSITIVE;
        }

        let distance_squared = t * t * direction.length_squared();
        let cosine = denom.abs() / direction.length();

        distance_squared / (cosine * self.area())
    }
}
