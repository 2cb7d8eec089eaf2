use anyhow::Result;
use vantage_base::{Error, ViewField};
use vantage_camera::{
    BoundingSphere, CameraEvent, CameraModel, GestureKind, ManipulationSettings, ViewState,
};
use vantage_math::{Mat4, Vec2, Vec3, Vec4};

const EPS: f64 = 1.0e-9;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() <= EPS, "{a} != {b}");
}

fn assert_vec_close(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, EPS), "{a:?} != {b:?}");
}

fn assert_orthonormal(camera: &CameraModel) {
    assert_close(camera.view_dir().length(), 1.0);
    assert_close(camera.view_up().length(), 1.0);
    assert_close(camera.view_dir().dot(camera.view_up()), 0.0);
}

fn bounded_camera() -> CameraModel {
    let mut camera = CameraModel::new();
    camera.set_bounding_sphere(Some(BoundingSphere::new(Vec3::ZERO, 10.0)));
    camera.take_events();
    camera
}

#[test]
fn default_camera_looks_along_world_y() {
    let camera = CameraModel::new();
    assert_eq!(camera.view_up(), Vec3::Z);
    assert_eq!(camera.view_dir(), Vec3::Y);
    assert_eq!(camera.view_center(), Vec3::ZERO);
    assert_close(camera.view_distance(), 20.0);
    assert_close(camera.fov_y(), 30.0);
    assert_close(camera.aspect(), 1.0);
    assert!(!camera.is_ortho());
    assert_eq!(camera.cull_mask(), u32::MAX);
    assert!(!camera.view_change_in_progress());
    assert_vec_close(camera.eye_position(), Vec3::new(0.0, -20.0, 0.0));
}

#[test]
fn ortho_without_fit_keeps_projection_finite() {
    let mut camera = bounded_camera();
    camera.set_ortho(true);

    let top = 15.0f64.to_radians().tan() * 20.0;
    assert_close(camera.ortho_top(), top);
    assert_close(camera.ortho_bottom(), -top);
    let projection = camera.projection_matrix();
    assert!(
        projection
            .to_cols_array_2d()
            .iter()
            .flatten()
            .all(|value| value.is_finite()),
        "{projection}"
    );
    assert_close(projection.get(1, 1), 1.0 / top);
}

#[test]
fn empty_ortho_extents_fall_back_to_identity() {
    let mut camera = bounded_camera();
    camera.set_ortho(true);
    camera.set_ortho_extents(1.0, 1.0);
    assert_eq!(camera.projection_matrix(), Mat4::IDENTITY);

    camera.take_events();
    camera.start_pan(Vec2::ZERO, Vec4::new(0.0, 1.0, 0.0, 0.0));
    camera.finish_pan(Vec2::new(0.3, 0.2));
    assert_eq!(camera.view_center(), Vec3::ZERO);
    assert_eq!(camera.take_events(), vec![CameraEvent::Changed]);
}

#[test]
fn clip_planes_bracket_the_bound() {
    let mut camera = bounded_camera();
    assert_eq!(camera.clip_planes(), Some((10.0, 30.0)));

    camera.set_ortho(true);
    assert_eq!(camera.clip_planes(), Some((10.0, 30.0)));

    camera.set_ortho(false);
    camera.set_view_distance(5.0);
    let (near, far) = camera.clip_planes().unwrap();
    assert_close(far, 15.0);
    assert_close(near, 15.0 / 2000.0);
}

#[test]
fn projection_without_bound_is_identity() {
    let camera = CameraModel::new();
    assert_eq!(camera.clip_planes(), None);
    assert_eq!(camera.projection_matrix(), Mat4::IDENTITY);
}

#[test]
fn projection_maps_clip_planes_to_depth_range() -> Result<()> {
    let camera = bounded_camera();
    let projection = camera.projection_matrix();
    let view = camera.view_matrix();
    let near_point = view
        .transform_point(Vec3::new(0.0, -10.0, 0.0))
        .and_then(|p| projection.transform_point(p))
        .ok_or_else(|| anyhow::anyhow!("near point at infinity"))?;
    let far_point = view
        .transform_point(Vec3::new(0.0, 10.0, 0.0))
        .and_then(|p| projection.transform_point(p))
        .ok_or_else(|| anyhow::anyhow!("far point at infinity"))?;
    assert_close(near_point.z, -1.0);
    assert_close(far_point.z, 1.0);
    Ok(())
}

#[test]
fn view_matrix_inverts_camera_to_world() {
    let mut camera = bounded_camera();
    camera.start_orbit(Vec2::new(0.2, 0.1));
    camera.orbit(Vec2::new(-0.3, 0.45));
    camera.finish_orbit(Vec2::new(-0.35, 0.5));
    camera.set_view_center(Vec3::new(3.0, -1.0, 2.0));

    let product = camera.view_matrix() * camera.camera_to_world();
    assert!(product.abs_diff_eq(&Mat4::IDENTITY, EPS), "{product}");

    let eye_in_camera = camera
        .view_matrix()
        .transform_point(camera.eye_position())
        .unwrap();
    assert_vec_close(eye_in_camera, Vec3::ZERO);
}

#[test]
fn set_eye_position_keeps_center() {
    let mut camera = CameraModel::new();
    camera.set_eye_position(Vec3::new(0.0, 0.0, 30.0));
    assert_vec_close(camera.view_dir(), Vec3::new(0.0, 0.0, -1.0));
    assert_close(camera.view_distance(), 30.0);
    assert_eq!(camera.view_center(), Vec3::ZERO);
    assert_vec_close(camera.eye_position(), Vec3::new(0.0, 0.0, 30.0));
    assert_orthonormal(&camera);
}

#[test]
fn set_eye_position_to_current_eye_is_silent() {
    let mut camera = CameraModel::new();
    camera.set_eye_position(Vec3::new(0.0, -20.0, 0.0));
    assert!(camera.take_events().is_empty());
}

#[test]
fn set_view_center_keeps_eye() {
    let mut camera = CameraModel::new();
    let eye = camera.eye_position();
    camera.set_view_center(Vec3::new(10.0, 0.0, 0.0));
    assert_vec_close(camera.eye_position(), eye);
    assert_close(camera.view_distance(), 500.0f64.sqrt());
    assert_orthonormal(&camera);
}

#[test]
fn zero_view_dir_is_ignored() {
    let mut camera = CameraModel::new();
    camera.set_view_dir(Vec3::ZERO);
    camera.set_up_and_dir(Vec3::X, Vec3::ZERO);
    assert_eq!(camera.view_dir(), Vec3::Y);
    assert_eq!(camera.view_up(), Vec3::Z);
    assert!(camera.take_events().is_empty());
}

#[test]
fn degenerate_up_falls_back_to_world_axis() {
    let mut camera = CameraModel::new();
    camera.set_up_and_dir(Vec3::Y, Vec3::Y);
    assert_orthonormal(&camera);
    assert_vec_close(camera.view_up(), Vec3::Z);
}

#[test]
fn fit_to_screen_frames_bound() {
    let mut camera = CameraModel::new();
    camera.set_bounding_sphere(Some(BoundingSphere::new(Vec3::new(1.0, 2.0, 3.0), 5.0)));
    camera.set_fov_y(60.0);
    camera.fit_to_screen();

    assert_eq!(camera.view_center(), Vec3::new(1.0, 2.0, 3.0));
    assert_close(camera.fov_y(), 30.0);
    assert_close(camera.view_distance(), 5.0 / 15.0f64.to_radians().tan());
    assert_close(camera.ortho_top(), 5.0);
    assert_close(camera.ortho_bottom(), -5.0);
}

#[test]
fn fit_to_screen_substitutes_empty_radius() {
    let mut camera = CameraModel::new();
    camera.set_bounding_sphere(Some(BoundingSphere::new(Vec3::ZERO, 0.0)));
    camera.fit_to_screen();
    assert_close(camera.ortho_top(), 10.0);
}

#[test]
fn fit_without_bound_changes_nothing() {
    let mut camera = CameraModel::new();
    let before = camera.view_state();
    camera.fit_to_screen();
    assert_eq!(camera.view_state(), before);
    assert!(camera.take_events().is_empty());
}

#[test]
fn initial_view_resets_basis() {
    let mut camera = bounded_camera();
    camera.set_eye_position(Vec3::new(5.0, 5.0, 5.0));
    camera.compute_initial_view();
    assert_vec_close(camera.view_dir(), Vec3::Y);
    assert_vec_close(camera.view_up(), Vec3::Z);
    assert_close(camera.ortho_top(), 10.0);
}

#[test]
fn yaw_pitch_roll_of_level_view() {
    let camera = CameraModel::new();
    let ypr = camera.yaw_pitch_roll();
    assert_close(ypr.x, 90.0);
    assert_close(ypr.y, 0.0);
    assert_close(ypr.z, 0.0);
}

#[test]
fn yaw_pitch_roll_looking_straight_down() {
    let mut camera = CameraModel::new();
    camera.set_up_and_dir(Vec3::Y, Vec3::new(0.0, 0.0, -1.0));
    let ypr = camera.yaw_pitch_roll();
    assert_close(ypr.x, 90.0);
    assert_close(ypr.y, -90.0);
    assert_close(ypr.z, 0.0);
}

#[test]
fn roll_grows_clockwise() {
    let mut camera = CameraModel::new();
    camera.set_up_and_dir(Vec3::X, Vec3::Y);
    assert_close(camera.yaw_pitch_roll().z, 270.0);
}

#[test]
fn az_el_round_trips() {
    let mut camera = CameraModel::new();
    camera.set_view_dir_from_az_el(Vec2::new(30.0, 20.0));
    let az_el = camera.az_el();
    assert_close(az_el.x, 30.0);
    assert_close(az_el.y, 20.0);
    assert_orthonormal(&camera);
}

#[test]
fn save_load_reproduces_every_field() -> Result<()> {
    let mut camera = bounded_camera();
    camera.start_orbit(Vec2::new(0.3, -0.1));
    camera.finish_orbit(Vec2::new(-0.2, 0.4));
    camera.set_aspect(1.7);
    camera.set_ortho(true);
    camera.fit_to_screen();

    let text = camera.save_view();
    let mut restored = CameraModel::new();
    restored.load_view(&text)?;
    assert_eq!(restored.view_state(), camera.view_state());
    assert_eq!(restored.save_view(), text);
    Ok(())
}

#[test]
fn default_view_text() {
    let camera = CameraModel::new();
    assert_eq!(camera.save_view(), "0 0 1 0 1 0 0 0 0 20 30 false 1 0 0");
}

#[test]
fn load_ignores_trailing_tokens() -> Result<()> {
    let mut camera = CameraModel::new();
    camera.load_view("0 0 1 1 0 0 4 5 6 12 45 true 2 -3 3 extra tokens")?;
    assert_eq!(camera.view_dir(), Vec3::X);
    assert_eq!(camera.view_center(), Vec3::new(4.0, 5.0, 6.0));
    assert!(camera.is_ortho());
    assert_close(camera.ortho_top(), 3.0);
    Ok(())
}

#[test]
fn failed_load_leaves_camera_untouched() {
    let mut camera = CameraModel::new();
    let before = camera.view_state();

    let err = camera
        .load_view("0 0 1 0 1 0 9 9 9 20 30 maybe 1 0 0")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::ViewParse {
            field: ViewField::Ortho,
            ..
        }
    ));

    let err = camera.load_view("0 0 1 0 1 0 9 9").unwrap_err();
    assert!(matches!(
        err,
        Error::ViewParse {
            field: ViewField::CenterZ,
            ..
        }
    ));

    assert_eq!(camera.view_state(), before);
    assert!(camera.take_events().is_empty());
}

#[test]
fn load_rejects_degenerate_basis() {
    let mut camera = CameraModel::new();
    let before = camera.view_state();

    let cases = [
        ("0 0 1 0 0 0 0 0 0 -5 30 false 1 -1 1", ViewField::DirX),
        ("0 0 1 0 0 2 0 0 0 20 30 false 1 -1 1", ViewField::UpX),
        ("0 0 1 0 1 0 0 0 0 -5 30 false 1 -1 1", ViewField::Distance),
        ("0 0 1 0 1 0 0 0 0 0 30 false 1 -1 1", ViewField::Distance),
    ];
    for (text, expected) in cases {
        let err = camera.load_view(text).unwrap_err();
        assert!(
            matches!(err, Error::ViewParse { field, .. } if field == expected),
            "{text}: {err}"
        );
    }

    assert_eq!(camera.view_state(), before);
    assert!(camera.take_events().is_empty());
}

#[test]
fn view_state_rejects_capitalized_bool() {
    let parsed = "0 0 1 0 1 0 0 0 0 20 30 True 1 0 0".parse::<ViewState>();
    assert!(parsed.is_err());
}

#[test]
fn stash_and_restore() -> Result<()> {
    let mut camera = bounded_camera();
    assert!(!camera.restore_view()?);

    camera.stash_view();
    let stashed = camera.view_state();
    camera.start(GestureKind::Rotate, Vec2::ZERO);
    camera.finish(GestureKind::Rotate, Vec2::new(0.4, 0.1));
    assert_ne!(camera.view_state(), stashed);

    camera.take_events();
    assert!(camera.restore_view()?);
    assert_eq!(camera.view_state(), stashed);
    assert_eq!(camera.take_events(), vec![CameraEvent::Changed]);
    Ok(())
}

#[test]
fn cull_mask_changes_are_reported() {
    let mut camera = CameraModel::new();
    camera.clear_cull_mask_bits(0b1);
    camera.set_cull_mask_bits(0b1);
    assert_eq!(
        camera.take_events(),
        vec![
            CameraEvent::CullMaskChanged(u32::MAX - 1),
            CameraEvent::CullMaskChanged(u32::MAX),
        ]
    );
}

#[test]
fn settings_load_from_partial_json() -> Result<()> {
    let settings = ManipulationSettings::from_json(r#"{ "fov_y_scale_factor": 1.25 }"#)?;
    assert_close(settings.fov_y_scale_factor, 1.25);
    assert!(settings.clamp_fov_y);
    assert_eq!(settings.dolly_center_change_threshold, 10);

    let err = ManipulationSettings::from_json(r#"{ "fov_y_scale_factor": 0.5 }"#).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    let err = ManipulationSettings::from_json("{ not json").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
    Ok(())
}

#[test]
fn settings_load_reads_json_file() -> Result<()> {
    let dir = std::env::temp_dir().join(format!("vantage-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("settings.json");
    std::fs::write(&path, r#"{ "dolly_center_change_threshold": 3 }"#)?;

    let settings = ManipulationSettings::load(&path)?;
    assert_eq!(settings.dolly_center_change_threshold, 3);

    let err = ManipulationSettings::load(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn bounding_sphere_from_points() {
    let points = [
        Vec3::new(-1.0, -2.0, 0.0),
        Vec3::new(3.0, 2.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
    ];
    let sphere = BoundingSphere::from_points(&points).unwrap();
    assert_vec_close(sphere.center, Vec3::new(1.0, 0.0, 0.5));
    for p in points {
        assert!((p - sphere.center).length() <= sphere.radius + EPS);
    }
    assert!(BoundingSphere::from_points(&[]).is_none());

    let boxed = BoundingSphere::from_bounds(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
    assert_close(boxed.radius, 3.0f64.sqrt());
}

#[test]
fn fov_scale_up_then_down_restores_fov() {
    let mut camera = CameraModel::new();
    camera.fov_y_scale_up();
    assert_close(camera.fov_y(), 33.0);
    camera.fov_y_scale_down();
    assert_close(camera.fov_y(), 30.0);
    assert_eq!(camera.take_events(), vec![CameraEvent::Changed, CameraEvent::Changed]);
}

#[test]
fn tightening_clamp_pulls_fov_into_range() {
    let mut camera = CameraModel::new();
    camera.set_clamp_fov_y_scale(true, 40.0, 90.0);
    assert_close(camera.fov_y(), 40.0);
    camera.fov_y_scale_down();
    assert_close(camera.fov_y(), 40.0);

    camera.set_clamp_fov_y_scale(false, 40.0, 90.0);
    camera.fov_y_scale_down();
    assert!(camera.fov_y() < 40.0);
}
