use approx::assert_relative_eq;
use cube_wave::linalg::{cross, dot, normalize, Mat4, Vec3, Vec4};

fn sample_matrix() -> Mat4 {
    Mat4::from_rows_array([
        [1.0, 2.0, 3.0, 4.0],
        [5.0, 6.0, 7.0, 8.0],
        [9.0, 10.0, 11.0, 12.0],
        [13.0, 14.0, 15.0, 16.0],
    ])
}

#[test]
fn test_normalize_unit_vector_is_unchanged() {
    for v in [Vec3::X, Vec3::Y, Vec3::Z, normalize(Vec3::new(1.0, 2.0, 3.0))] {
        let n = normalize(v);
        assert_relative_eq!(n.x, v.x, epsilon = 1e-6);
        assert_relative_eq!(n.y, v.y, epsilon = 1e-6);
        assert_relative_eq!(n.z, v.z, epsilon = 1e-6);
    }
}

#[test]
fn test_normalize_produces_unit_length() {
    let n = normalize(Vec3::new(20.0, 22.5, 20.0));
    assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_cross_is_anti_commutative() {
    let a = Vec3::new(1.0, -2.0, 0.5);
    let b = Vec3::new(3.0, 4.0, -1.0);
    assert_eq!(cross(a, b), -cross(b, a));
}

#[test]
fn test_cross_is_orthogonal_to_inputs() {
    let a = Vec3::new(1.0, -2.0, 0.5);
    let b = Vec3::new(3.0, 4.0, -1.0);
    let c = cross(a, b);
    assert_relative_eq!(dot(a, c), 0.0, epsilon = 1e-5);
    assert_relative_eq!(dot(b, c), 0.0, epsilon = 1e-5);
    assert_eq!(cross(Vec3::X, Vec3::Y), Vec3::Z);
}

#[test]
fn test_identity_is_neutral() {
    let m = sample_matrix();
    assert_eq!(Mat4::mul(&Mat4::IDENTITY, &m), m);
    assert_eq!(Mat4::mul(&m, &Mat4::IDENTITY), m);
}

#[test]
fn test_mul_is_associative() {
    let a = Mat4::IDENTITY.translate(Vec3::new(1.0, 2.0, 3.0));
    let b = Mat4::IDENTITY.scale(Vec3::new(2.0, 0.5, 4.0));
    let c = sample_matrix();
    let left = Mat4::mul(&Mat4::mul(&a, &b), &c);
    let right = Mat4::mul(&a, &Mat4::mul(&b, &c));
    assert!(left.approx_eq(&right, 1e-4));
}

#[test]
fn test_mul_applies_left_operand_first() {
    let translate = Mat4::IDENTITY.translate(Vec3::new(1.0, 0.0, 0.0));
    let scale = Mat4::IDENTITY.scale(Vec3::new(2.0, 2.0, 2.0));

    let p = Mat4::mul(&translate, &scale).transform_point(Vec3::ZERO);
    assert_eq!(p, Vec3::new(2.0, 0.0, 0.0));

    let q = Mat4::mul(&scale, &translate).transform_point(Vec3::ZERO);
    assert_eq!(q, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_transpose_twice_is_identity_operation() {
    let m = sample_matrix();
    assert_eq!(m.transpose().transpose(), m);
    assert_eq!(m.transpose()[0], Vec4::new(1.0, 5.0, 9.0, 13.0));
}

#[test]
fn test_perspective_maps_clip_planes() {
    let near = 0.1;
    let far = 100.0;
    let proj = Mat4::perspective(45.0, 4.0 / 3.0, near, far);

    let near_point = proj.transform_point(Vec3::new(0.0, 0.0, -near));
    let far_point = proj.transform_point(Vec3::new(0.0, 0.0, -far));
    assert_relative_eq!(near_point.z, -1.0, epsilon = 1e-4);
    assert_relative_eq!(far_point.z, 1.0, epsilon = 1e-4);
}

#[test]
fn test_perspective_field_of_view() {
    let proj = Mat4::perspective(90.0, 1.0, 1.0, 10.0);
    // At 90 degrees the top edge of the frustum is at y == -z.
    let edge = proj.transform_point(Vec3::new(0.0, 2.0, -2.0));
    assert_relative_eq!(edge.y, 1.0, epsilon = 1e-5);
}

#[test]
fn test_look_at_moves_eye_to_origin() {
    let eye = Vec3::new(20.0, 22.5, 20.0);
    let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);

    let origin = view.transform_point(eye);
    assert_relative_eq!(origin.length(), 0.0, epsilon = 1e-4);

    let target = view.transform_point(Vec3::ZERO);
    assert_relative_eq!(target.x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(target.y, 0.0, epsilon = 1e-4);
    assert_relative_eq!(target.z, -eye.length(), epsilon = 1e-4);
}

#[test]
fn test_translate_accumulates() {
    let m = Mat4::IDENTITY
        .translate(Vec3::new(1.0, 2.0, 3.0))
        .translate(Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(m.translation(), Vec3::new(2.0, 3.0, 4.0));
}

#[test]
fn test_scale_multiplies_diagonal() {
    let m = Mat4::IDENTITY
        .scale(Vec3::new(2.0, 3.0, 4.0))
        .scale(Vec3::new(0.5, 2.0, 1.0));
    assert_eq!(m.diagonal(), Vec4::new(1.0, 6.0, 4.0, 1.0));
}

#[test]
fn test_translate_after_scale_leaves_offset_unscaled() {
    let m = Mat4::IDENTITY
        .scale(Vec3::new(2.0, 2.0, 2.0))
        .translate(Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(m.translation(), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(m.diagonal(), Vec4::new(2.0, 2.0, 2.0, 1.0));
}

#[test]
fn test_wgpu_depth_maps_near_to_zero_and_far_to_w() {
    let near = 0.1;
    let far = 100.0;
    let proj = Mat4::perspective(45.0, 4.0 / 3.0, near, far).to_wgpu_depth();

    let near_clip = proj.transform_vec4(Vec4::new(0.0, 0.0, -near, 1.0));
    assert_relative_eq!(near_clip.z, 0.0, epsilon = 1e-5);
    assert_relative_eq!(near_clip.w, near, epsilon = 1e-6);

    let far_clip = proj.transform_vec4(Vec4::new(0.0, 0.0, -far, 1.0));
    assert_relative_eq!(far_clip.z / far_clip.w, 1.0, epsilon = 1e-4);
}

#[test]
fn test_wgpu_depth_keeps_points_just_past_near() {
    let proj = Mat4::perspective(45.0, 4.0 / 3.0, 0.1, 100.0);
    let point = Vec4::new(0.0, 0.0, -0.15, 1.0);

    // The OpenGL form puts this point below zero, outside wgpu's depth range.
    assert!(proj.transform_vec4(point).z < 0.0);

    let clip = proj.to_wgpu_depth().transform_vec4(point);
    assert!(clip.z > 0.0 && clip.z < clip.w, "z = {}, w = {}", clip.z, clip.w);
}

#[test]
fn test_wgpu_depth_leaves_x_y_and_w_alone() {
    let clip = Mat4::GL_TO_WGPU_DEPTH.transform_vec4(Vec4::new(3.0, -2.0, -1.0, 1.0));
    assert_eq!(clip, Vec4::new(3.0, -2.0, 0.0, 1.0));
}
