use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use spirv_std::num_traits::Float;

use crate::{HitRecord, MaterialId, Ray};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Triangle {
    /// x, y, z - vertex A, w - object uid (bits)
    pub d0: Vec4,

    /// x, y, z - vertex B, w - material id (bits)
    pub d1: Vec4,

    /// x, y, z - vertex C
    pub d2: Vec4,

    /// x, y, z - normal at A
    pub d3: Vec4,

    /// x, y, z - normal at B
    pub d4: Vec4,

    /// x, y, z - normal at C
    pub d5: Vec4,
}

impl Triangle {
    pub fn new(
        positions: [Vec3; 3],
        normals: [Vec3; 3],
        material_id: MaterialId,
        object_uid: u32,
    ) -> Self {
        Self {
            d0: positions[0].extend(f32::from_bits(object_uid)),
            d1: positions[1].extend(f32::from_bits(material_id.get())),
            d2: positions[2].extend(0.0),
            d3: normals[0].extend(0.0),
            d4: normals[1].extend(0.0),
            d5: normals[2].extend(0.0),
        }
    }

    /// Builds a flat-shaded triangle, deriving one normal from the winding.
    pub fn flat(
        positions: [Vec3; 3],
        material_id: MaterialId,
        object_uid: u32,
    ) -> Self {
        let normal = (positions[1] - positions[0])
            .cross(positions[2] - positions[0])
            .normalize();

        Self::new(positions, [normal; 3], material_id, object_uid)
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.truncate()
    }

    pub fn position1(&self) -> Vec3 {
        self.d1.truncate()
    }

    pub fn position2(&self) -> Vec3 {
        self.d2.truncate()
    }

    pub fn normal0(&self) -> Vec3 {
        self.d3.truncate()
    }

    pub fn normal1(&self) -> Vec3 {
        self.d4.truncate()
    }

    pub fn normal2(&self) -> Vec3 {
        self.d5.truncate()
    }

    pub fn object_uid(&self) -> u32 {
        self.d0.w.to_bits()
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d1.w.to_bits())
    }

    /// Möller-Trumbore; the determinant and every barycentric are rejected
    /// below `tmin` so degenerate and edge-grazing hits fall out.
    #[must_use]
    pub fn hit(
        &self,
        ray: &Ray,
        tmin: f32,
        tmax: f32,
        hit: &mut HitRecord,
    ) -> bool {
        let edge_ab = self.position1() - self.position0();
        let edge_ac = self.position2() - self.position0();
        let geometric_normal = edge_ab.cross(edge_ac);

        let det = -ray.direction().dot(geometric_normal);

        if det.abs() < tmin {
            return false;
        }

        let inv_det = 1.0 / det;
        let ao = ray.origin() - self.position0();
        let dao = ao.cross(ray.direction());

        let distance = ao.dot(geometric_normal) * inv_det;
        let u = edge_ac.dot(dao) * inv_det;
        let v = -edge_ab.dot(dao) * inv_det;
        let w = 1.0 - u - v;

        if distance <= tmin
            || distance >= tmax
            || u < tmin
            || v < tmin
            || w < tmin
        {
            return false;
        }

        let position = self.position0() * w
            + self.position1() * u
            + self.position2() * v;

        let mut normal = (self.normal0() * w
            + self.normal1() * u
            + self.normal2() * v)
            .normalize();

        let front_face = ray.direction().dot(normal) < 0.0;

        if !front_face {
            normal = -normal;
        }

        hit.global.position = position;
        hit.global.normal = normal;
        hit.local.position = position;
        hit.local.normal = normal;
        hit.distance = distance;
        hit.material_id = self.material_id();
        hit.object_uid = self.object_uid();
        hit.front_face = front_face;

        true
    }
}
