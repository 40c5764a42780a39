use glam::Vec3;

/// Scene-provided callables: analytic signed-distance classes and procedural
/// textures.
///
/// Core algorithms are generic over this seam, so the shader build stays
/// monomorphic while CPU tests can substitute their own fields.
pub trait Registry: Copy {
    /// Signed distance of `point` (object-local frame) to the class surface.
    fn sdf_distance(&self, class: u32, point: Vec3, time: f32) -> f32;

    /// Maps a local-frame hit back to the class "rest" frame; texturing
    /// samples there so patterns stick to animated surfaces.
    fn sdf_rest_position(&self, class: u32, point: Vec3, time: f32) -> Vec3;

    /// Unit-range color of a procedural texture.
    fn procedural_color(
        &self,
        id: u32,
        point: Vec3,
        normal: Vec3,
        time: f32,
        dp_dx: Vec3,
        dp_dy: Vec3,
    ) -> Vec3;
}
