//! Screen-Space Transform Tests
//!
//! Tests for:
//! - Viewport scale and half-texel limit
//! - Pixel coordinate → view direction matrix (perspective, lens shift,
//!   cubemap faces, orthographic)
//! - FoV recovery from a GPU projection
//! - Projection aspect and dispatch sizing

use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

use rendering_utils::screen_space::{
    PhysicalLens, compute_pixel_coord_to_world_space_view_direction_matrix as pixel_to_view_dir,
    compute_pixel_coord_to_world_space_view_direction_matrix_for_camera as camera_view_dir,
    compute_viewport_limit, compute_viewport_scale, compute_viewport_scale_and_limit,
    div_round_up, projection_matrix_aspect, screen_size_vector,
};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn approx_mat4(a: &Mat4, b: &Mat4) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| approx(*x, *y))
}

/// GPU projection convention: Y flipped.
fn gpu_perspective(fov: f32, aspect: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0)) * Mat4::perspective_rh(fov, aspect, 0.1, 100.0)
}

/// What a shader computes: `vec4(px, py, 1, 1) * M`.
fn pixel_direction(m: &Mat4, px: f32, py: f32) -> Vec3 {
    m.transpose().mul_vec4(Vec4::new(px, py, 1.0, 1.0)).truncate()
}

const SCREEN: UVec2 = UVec2::new(1920, 1080);
const FOV: f32 = std::f32::consts::FRAC_PI_3;

/// Perspective direction matrix for a `SCREEN`-sized target.
fn perspective(fov: f32, lens_shift: Vec2, view: Mat4, aspect: Option<f32>) -> Mat4 {
    let screen = screen_size_vector(SCREEN);
    pixel_to_view_dir(fov, lens_shift, screen, view, false, aspect, false)
}

// ============================================================================
// Viewport Scale & Limit
// ============================================================================

#[test]
fn viewport_inside_larger_buffer() {
    assert!(approx(compute_viewport_scale(1920, 2048), 0.9375));
    assert!(approx(compute_viewport_limit(1920, 2048), 1919.5 / 2048.0));
}

#[test]
fn viewport_equal_to_buffer() {
    assert!(approx(compute_viewport_scale(1080, 1080), 1.0));
    assert!(approx(compute_viewport_limit(1080, 1080), 1079.5 / 1080.0));
}

#[test]
fn scale_and_limit_packs_both_axes() {
    let v = compute_viewport_scale_and_limit(UVec2::new(960, 540), UVec2::new(1920, 1080));
    assert!(approx(v.x, 0.5));
    assert!(approx(v.y, 0.5));
    assert!(approx(v.z, 959.5 / 1920.0));
    assert!(approx(v.w, 539.5 / 1080.0));
}

// ============================================================================
// Pixel → View Direction
// ============================================================================

#[test]
fn center_pixel_looks_back_along_forward() {
    let forward = Vec3::X;
    let view = Mat4::look_at_rh(Vec3::new(3.0, 2.0, 1.0), Vec3::new(4.0, 2.0, 1.0), Vec3::Y);
    let m = perspective(FOV, Vec2::ZERO, view, None);

    let dir = pixel_direction(&m, 960.0, 540.0).normalize();
    assert!(approx_vec3(dir, -forward), "got {dir}");
}

#[test]
fn camera_position_is_ignored() {
    let a = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    let b = Mat4::look_at_rh(Vec3::new(10.0, -5.0, 2.0), Vec3::new(10.0, -5.0, 1.0), Vec3::Y);

    let ma = perspective(FOV, Vec2::ZERO, a, None);
    let mb = perspective(FOV, Vec2::ZERO, b, None);

    assert!(approx_mat4(&ma, &mb));
}

#[test]
fn top_edge_is_half_fov_from_center() {
    let m = perspective(FOV, Vec2::ZERO, Mat4::IDENTITY, None);

    let center = pixel_direction(&m, 960.0, 540.0);
    let top = pixel_direction(&m, 960.0, 0.0);
    assert!(approx(center.angle_between(top), FOV * 0.5));
}

#[test]
fn explicit_aspect_overrides_screen() {
    let derived = perspective(FOV, Vec2::ZERO, Mat4::IDENTITY, None);
    let explicit = perspective(FOV, Vec2::ZERO, Mat4::IDENTITY, Some(1920.0 / 1080.0));
    let anamorphic = perspective(FOV, Vec2::ZERO, Mat4::IDENTITY, Some(2.39));

    assert!(approx_mat4(&derived, &explicit));
    assert!(!approx_mat4(&derived, &anamorphic));
}

#[test]
fn lens_shift_moves_optical_center() {
    // A half-screen vertical shift puts the optical axis on the top edge.
    let m = perspective(FOV, Vec2::new(0.0, 0.5), Mat4::IDENTITY, None);

    let top = pixel_direction(&m, 960.0, 0.0).normalize();
    assert!(approx_vec3(top, Vec3::Z), "got {top}");
}

#[test]
fn cubemap_face_flips_y() {
    let screen = screen_size_vector(UVec2::splat(512));
    let fov = std::f32::consts::FRAC_PI_2;
    let view = Mat4::IDENTITY;
    let regular = pixel_to_view_dir(fov, Vec2::ZERO, screen, view, false, None, false);
    let cube = pixel_to_view_dir(fov, Vec2::ZERO, screen, view, true, None, false);

    let a = pixel_direction(&regular, 100.0, 30.0);
    let b = pixel_direction(&cube, 100.0, 30.0);
    assert!(approx(a.x, b.x));
    assert!(approx(a.y, -b.y));
    assert!(approx(a.z, b.z));
}

#[test]
fn orthographic_ignores_fov_and_shares_one_direction() {
    let screen = screen_size_vector(SCREEN);
    let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Y, Vec3::Z);
    let shift = Vec2::new(0.2, 0.1);

    let narrow = pixel_to_view_dir(0.3, Vec2::ZERO, screen, view, false, None, true);
    let wide = pixel_to_view_dir(1.4, shift, screen, view, false, None, true);
    assert!(approx_mat4(&narrow, &wide));

    let center = narrow.transpose() * Vec4::new(960.0, 540.0, 1.0, 1.0);
    assert!(approx(center.w, 0.0));
    assert!(approx_vec3(center.truncate(), Vec3::Y), "got {center}");
}

// ============================================================================
// Camera Overload
// ============================================================================

#[test]
fn camera_overload_recovers_fov_from_projection() {
    let screen = screen_size_vector(SCREEN);
    let view = Mat4::look_at_rh(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
    let projection = gpu_perspective(FOV, 1920.0 / 1080.0);

    let direct = perspective(FOV, Vec2::ZERO, view, None);
    let from_camera = camera_view_dir(view, projection, screen, None, None, false);

    assert!(approx_mat4(&direct, &from_camera));
}

#[test]
fn physical_lens_overrides_projection() {
    let screen = screen_size_vector(SCREEN);
    let lens = PhysicalLens {
        vertical_fov: 0.8,
        lens_shift: Vec2::new(0.1, -0.05),
    };
    let projection = gpu_perspective(FOV, 1920.0 / 1080.0);
    let view = Mat4::IDENTITY;

    let direct = perspective(0.8, lens.lens_shift, view, None);
    let from_camera = camera_view_dir(view, projection, screen, Some(lens), None, false);

    assert!(approx_mat4(&direct, &from_camera));
}

// ============================================================================
// Misc
// ============================================================================

#[test]
fn projection_aspect_round_trips() {
    for aspect in [1.0, 16.0 / 9.0, 0.5, 2.39] {
        let projection = gpu_perspective(FOV, aspect);
        assert!(approx(projection_matrix_aspect(&projection), aspect), "aspect {aspect}");
    }
}

#[test]
fn dispatch_sizes_round_up() {
    assert_eq!(div_round_up(1920, 8), 240);
    assert_eq!(div_round_up(1080, 8), 135);
    assert_eq!(div_round_up(1081, 8), 136);
    assert_eq!(div_round_up(0, 8), 0);
}
