use candela_gpu::prelude::*;

#[spirv(vertex)]
pub fn vs(
    #[spirv(vertex_index)] vert_idx: i32,
    #[spirv(position)] output: &mut Vec4,
) {
    // Full-screen triangle.
    let uv = vec2(((vert_idx << 1) & 2) as f32, (vert_idx & 2) as f32);
    let position = 2.0 * uv - Vec2::ONE;

    *output = position.extend(0.0).extend(1.0);
}

/// Divides the accumulator by the frame counter and maps it to the display:
/// ACES, gamma, and a gradient-noise dither against banding.
#[spirv(fragment)]
pub fn fs(
    #[spirv(frag_coord)] position: Vec4,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] uniforms: &Uniforms,
    #[spirv(descriptor_set = 1, binding = 0, storage_buffer)]
    colors: &[Vec4],
    frag_color: &mut Vec4,
) {
    let screen_pos = position.xy().as_uvec2();
    let screen_idx = uniforms.screen_to_idx(screen_pos);
    let frames = uniforms.frame_number().max(1) as f32;

    let mut color = colors[screen_idx].xyz() / frames;

    color = aces_film(color);
    color = gamma_correct(color);
    color += Vec3::splat(dither_offset(position.xy()));

    *frag_color = color.extend(1.0);
}
