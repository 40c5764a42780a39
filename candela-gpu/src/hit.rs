use glam::Vec3;

use crate::MaterialId;

/// Position and normal of a surface point, tracked in one coordinate frame.
///
/// Every hit keeps two of these: the world frame drives shading and secondary
/// rays, the object-local frame drives texturing.
#[derive(Copy, Clone, Default)]
pub struct HitPlace {
    pub position: Vec3,
    pub normal: Vec3,
}

/// The last-written intersection; per-ray scratch threaded explicitly through
/// the call chain.
#[derive(Copy, Clone)]
pub struct HitRecord {
    pub global: HitPlace,
    pub local: HitPlace,
    pub distance: f32,
    pub material_id: MaterialId,
    pub object_uid: u32,
    pub front_face: bool,
}

impl HitRecord {
    pub fn none() -> Self {
        Self {
            global: Default::default(),
            local: Default::default(),
            distance: f32::MAX,
            material_id: MaterialId::new(0),
            object_uid: 0,
            front_face: false,
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}

impl Default for HitRecord {
    fn default() -> Self {
        Self::none()
    }
}
