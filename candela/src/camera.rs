use glam::{Mat4, Vec3, Vec4};

use crate::gpu;

/// Look-at perspective camera: every pixel ray starts at the eye.
pub fn perspective_camera(eye: Vec3, look_at: Vec3, up: Vec3) -> gpu::Camera {
    let back = (eye - look_at).normalize();
    let right = up.cross(back).normalize();
    let true_up = back.cross(right);

    gpu::Camera {
        view: Mat4::from_cols(
            right.extend(0.0),
            true_up.extend(0.0),
            back.extend(0.0),
            eye.extend(1.0),
        ),
        // Collapses every pixel point onto the eye.
        ray_origin_view: Mat4::from_cols(
            Vec4::ZERO,
            Vec4::ZERO,
            Vec4::ZERO,
            eye.extend(1.0),
        ),
    }
}

/// Look-at orthographic camera: pixel rays start on the camera plane, all
/// parallel to the view direction.
pub fn orthographic_camera(eye: Vec3, look_at: Vec3, up: Vec3) -> gpu::Camera {
    let perspective = perspective_camera(eye, look_at, up);
    let forward = (look_at - eye).normalize();

    // Projects the pixel point back onto the plane through the eye:
    // p - f·(f·p) + f·(f·eye).
    let column = |axis: Vec3, f_component: f32| {
        (axis - forward * f_component).extend(0.0)
    };

    gpu::Camera {
        view: perspective.view,
        ray_origin_view: Mat4::from_cols(
            column(Vec3::X, forward.x),
            column(Vec3::Y, forward.y),
            column(Vec3::Z, forward.z),
            (forward * forward.dot(eye)).extend(1.0),
        ),
    }
}
