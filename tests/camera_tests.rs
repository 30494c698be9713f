use cube_wave::{
    camera::{build_projection, build_view, build_view_projection, Camera, CameraConfig},
    linalg::{Mat4, Vec3},
    SetupError,
};

fn glam_view_projection(config: &CameraConfig) -> [[f32; 4]; 4] {
    let to_glam = |v: Vec3| glam::Vec3::new(v.x, v.y, v.z);
    let view = glam::Mat4::look_at_rh(to_glam(config.eye), to_glam(config.target), to_glam(config.up));
    let projection = glam::Mat4::perspective_rh_gl(
        config.fov_degrees.to_radians(),
        config.aspect_ratio,
        config.near,
        config.far,
    );
    // Column-vector P * V read by columns is the row-vector V * P read by rows.
    (projection * view).to_cols_array_2d()
}

fn assert_matches_reference(actual: &Mat4, expected: [[f32; 4]; 4]) {
    for i in 0..4 {
        for j in 0..4 {
            let diff = (actual[i][j] - expected[i][j]).abs();
            assert!(
                diff <= 1e-5,
                "element [{}][{}]: {} vs reference {}",
                i,
                j,
                actual[i][j],
                expected[i][j]
            );
        }
    }
}

#[test]
fn test_default_view_projection_matches_reference() {
    let config = CameraConfig::default();
    assert_eq!(config.aspect_ratio, 800.0 / 600.0);

    let matrix = build_view_projection(&config);
    assert_matches_reference(&matrix, glam_view_projection(&config));
}

#[test]
fn test_view_and_projection_match_reference_separately() {
    let config = CameraConfig::default().with_surface_size(1920, 1080);
    let to_glam = |v: Vec3| glam::Vec3::new(v.x, v.y, v.z);

    let view = glam::Mat4::look_at_rh(to_glam(config.eye), to_glam(config.target), to_glam(config.up));
    assert_matches_reference(&build_view(&config), view.to_cols_array_2d());

    let projection = glam::Mat4::perspective_rh_gl(
        config.fov_degrees.to_radians(),
        config.aspect_ratio,
        config.near,
        config.far,
    );
    assert_matches_reference(&build_projection(&config), projection.to_cols_array_2d());
}

#[test]
fn test_camera_creation() {
    let camera = Camera::new(CameraConfig::default()).unwrap();
    let matrix = camera.view_projection();

    assert_ne!(matrix, Mat4::IDENTITY, "Camera matrix should not be identity");
    assert!(matrix.is_finite(), "Camera matrix contains non-finite values");
    assert_eq!(matrix, Mat4::mul(&camera.view(), &camera.projection()));
}

#[test]
fn test_camera_aspect_ratio_update() {
    let mut camera = Camera::new(CameraConfig::default()).unwrap();
    let initial = camera.view_projection();
    let view = camera.view();

    camera.set_aspect_ratio(16.0 / 9.0);
    assert_ne!(initial, camera.view_projection(), "Matrix should change after aspect update");
    assert_eq!(view, camera.view(), "View does not depend on the aspect ratio");
    assert_matches_reference(&camera.view_projection(), glam_view_projection(camera.config()));
}

#[test]
fn test_invalid_aspect_ratio_is_ignored() {
    let mut camera = Camera::new(CameraConfig::default()).unwrap();
    let initial = camera.view_projection();
    camera.set_aspect_ratio(0.0);
    camera.set_aspect_ratio(f32::NAN);
    assert_eq!(initial, camera.view_projection());
}

#[test]
fn test_origin_projects_inside_clip_volume() {
    let camera = Camera::new(CameraConfig::default()).unwrap();
    let p = camera.view_projection().transform_point(Vec3::ZERO);
    assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
    assert!(p.z > -1.0 && p.z < 1.0);
}

#[test]
fn test_rejects_bad_clip_planes() {
    let config = CameraConfig {
        near: 0.0,
        ..CameraConfig::default()
    };
    assert!(matches!(Camera::new(config), Err(SetupError::Camera(_))));

    let config = CameraConfig {
        near: 10.0,
        far: 5.0,
        ..CameraConfig::default()
    };
    assert!(matches!(config.validate(), Err(SetupError::Camera(_))));
}

#[test]
fn test_rejects_degenerate_orientation() {
    let config = CameraConfig {
        target: CameraConfig::default().eye,
        ..CameraConfig::default()
    };
    assert!(matches!(config.validate(), Err(SetupError::Camera(_))));

    let config = CameraConfig {
        eye: Vec3::new(0.0, 10.0, 0.0),
        ..CameraConfig::default()
    };
    assert!(matches!(config.validate(), Err(SetupError::Camera(_))));
}

#[test]
fn test_rejects_bad_field_of_view() {
    for fov in [0.0, 180.0, -10.0] {
        let config = CameraConfig {
            fov_degrees: fov,
            ..CameraConfig::default()
        };
        assert!(config.validate().is_err(), "fov {} should be rejected", fov);
    }
}
