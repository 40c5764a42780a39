use glam::Vec3;
use spirv_std::num_traits::Float;

pub trait Vec3Ext
where
    Self: Sized,
{
    fn reflect(self, normal: Self) -> Self;
    fn refract(self, normal: Self, eta: f32) -> Self;
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    fn reflect(self, normal: Self) -> Self {
        self - 2.0 * normal.dot(self) * normal
    }

    fn refract(self, normal: Self, eta: f32) -> Self {
        let cos_theta = (-self).dot(normal).min(1.0);
        let out_perp = eta * (self + cos_theta * normal);
        let out_parallel =
            -(1.0 - out_perp.length_squared()).abs().sqrt() * normal;

        out_perp + out_parallel
    }

    fn near_zero(self) -> bool {
        const EPSILON: f32 = 1e-8;

        self.x.abs() < EPSILON
            && self.y.abs() < EPSILON
            && self.z.abs() < EPSILON
    }
}
