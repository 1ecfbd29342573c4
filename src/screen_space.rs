//! Screen-Space Transforms
//!
//! Pure functions producing the per-camera vectors and matrices shaders use to
//! go from pixel coordinates to texture coordinates and view rays.
//!
//! # Provided Functions
//!
//! - Viewport scale/limit for sampling a viewport inside a larger buffer
//! - Pixel coordinate → world-space view direction matrix
//! - Projection aspect recovery and compute dispatch sizing
//!
//! Inputs are treated as preconditions: a zero buffer size or a degenerate
//! projection produces infinities/NaNs rather than an error.

use glam::{Mat4, UVec2, Vec2, Vec4};

// ============================================================================
// Viewport Scale & Limit
// ============================================================================

/// Scale mapping `[0, viewport)` onto the UV range of a `buffer_size` buffer.
#[inline]
#[must_use]
pub fn compute_viewport_scale(viewport_size: u32, buffer_size: u32) -> f32 {
    let rcp_buffer_size = 1.0 / buffer_size as f32;
    viewport_size as f32 * rcp_buffer_size
}

/// Largest UV that stays half a texel inside the viewport, so bilinear taps
/// never read the padding of a larger buffer.
#[inline]
#[must_use]
pub fn compute_viewport_limit(viewport_size: u32, buffer_size: u32) -> f32 {
    let rcp_buffer_size = 1.0 / buffer_size as f32;
    (viewport_size as f32 - 0.5) * rcp_buffer_size
}

/// Packs `(scale.x, scale.y, limit.x, limit.y)`.
#[must_use]
pub fn compute_viewport_scale_and_limit(viewport_size: UVec2, buffer_size: UVec2) -> Vec4 {
    Vec4::new(
        compute_viewport_scale(viewport_size.x, buffer_size.x),
        compute_viewport_scale(viewport_size.y, buffer_size.y),
        compute_viewport_limit(viewport_size.x, buffer_size.x),
        compute_viewport_limit(viewport_size.y, buffer_size.y),
    )
}

/// Screen size vector `(width, height, 1 / width, 1 / height)`.
#[must_use]
pub fn screen_size_vector(size: UVec2) -> Vec4 {
    let size = size.as_vec2();
    Vec4::new(size.x, size.y, 1.0 / size.x, 1.0 / size.y)
}

// ============================================================================
// Pixel → View Direction
// ============================================================================

/// Builds the matrix that turns a pixel coordinate into a world-space view
/// direction.
///
/// A shader evaluates `vec4(px, py, 1.0, 1.0) * M` (row vector on the left),
/// which on the CPU is `M.transpose() * Vec4::new(px, py, 1.0, 1.0)`. The result
/// is the view vector of the pixel, pointing from the scene back towards the
/// camera; negate it for the ray direction. It does not depend on the camera
/// position.
///
/// * `screen_size`: `(width, height, 1 / width, 1 / height)`, see [`screen_size_vector`]
/// * `aspect_ratio`: `None` derives it from `screen_size`; pass a value for
///   anamorphic projections
/// * `render_to_cubemap`: cubemap faces use the opposite Y convention
#[must_use]
pub fn compute_pixel_coord_to_world_space_view_direction_matrix(
    vertical_fov: f32,
    lens_shift: Vec2,
    screen_size: Vec4,
    world_to_view: Mat4,
    render_to_cubemap: bool,
    aspect_ratio: Option<f32>,
    is_orthographic: bool,
) -> Mat4 {
    let view_space_raster_transform = if is_orthographic {
        // No perspective: every pixel looks down the same axis.
        Mat4::from_cols(
            Vec4::new(-2.0 * screen_size.z, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -2.0 * screen_size.w, 0.0, 0.0),
            Vec4::new(1.0, 1.0, -1.0, 0.0),
            Vec4::ZERO,
        )
    } else {
        // V = -(X, Y, Z) with Z = 1:
        // X = (2x / resX - 1) * tan(vFoV / 2) * ar = x * [-m00] + [-m20]
        // Y = (2y / resY - 1) * tan(vFoV / 2)      = y * [-m11] + [-m21]
        let aspect_ratio = aspect_ratio.unwrap_or(screen_size.x * screen_size.w);
        let tan_half_vert_fov = (0.5 * vertical_fov).tan();

        let mut m21 = (1.0 - 2.0 * lens_shift.y) * tan_half_vert_fov;
        let mut m11 = -2.0 * screen_size.w * tan_half_vert_fov;

        let m20 = (1.0 - 2.0 * lens_shift.x) * tan_half_vert_fov * aspect_ratio;
        let m00 = -2.0 * screen_size.z * tan_half_vert_fov * aspect_ratio;

        if render_to_cubemap {
            m11 = -m11;
            m21 = -m21;
        }

        Mat4::from_cols(
            Vec4::new(m00, 0.0, 0.0, 0.0),
            Vec4::new(0.0, m11, 0.0, 0.0),
            Vec4::new(m20, m21, -1.0, 0.0),
            Vec4::W,
        )
    };

    let mut world_to_view = world_to_view;
    // Direction only.
    world_to_view.w_axis = Vec4::W;
    // Flip Z (row 2) to make the view space left-handed.
    world_to_view.x_axis.z = -world_to_view.x_axis.z;
    world_to_view.y_axis.z = -world_to_view.y_axis.z;
    world_to_view.z_axis.z = -world_to_view.z_axis.z;
    world_to_view.w_axis.z = -world_to_view.w_axis.z;

    (world_to_view.transpose() * view_space_raster_transform).transpose()
}

/// Physical camera lens parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalLens {
    /// Gate-fitted vertical field of view, in radians.
    pub vertical_fov: f32,
    pub lens_shift: Vec2,
}

/// [`compute_pixel_coord_to_world_space_view_direction_matrix`] for a camera
/// described by its GPU projection.
///
/// Without a physical lens the vertical field of view is recovered from
/// `gpu_projection`, which must use the Y-flipped GPU convention (see
/// [`projection_matrix_aspect`]).
#[must_use]
pub fn compute_pixel_coord_to_world_space_view_direction_matrix_for_camera(
    world_to_view: Mat4,
    gpu_projection: Mat4,
    resolution: Vec4,
    physical_lens: Option<PhysicalLens>,
    aspect_ratio: Option<f32>,
    is_orthographic: bool,
) -> Mat4 {
    let (vertical_fov, lens_shift) = match physical_lens {
        Some(lens) => (lens.vertical_fov, lens.lens_shift),
        None => ((-1.0 / gpu_projection.y_axis.y).atan() * 2.0, Vec2::ZERO),
    };

    compute_pixel_coord_to_world_space_view_direction_matrix(
        vertical_fov,
        lens_shift,
        resolution,
        world_to_view,
        false,
        aspect_ratio,
        is_orthographic,
    )
}

// ============================================================================
// Misc
// ============================================================================

/// Aspect ratio of a GPU projection matrix (Y flipped, so `m[1][1] < 0`).
#[inline]
#[must_use]
pub fn projection_matrix_aspect(matrix: &Mat4) -> f32 {
    -matrix.y_axis.y / matrix.x_axis.x
}

/// Integer ceiling division, used to size compute dispatches.
#[inline]
#[must_use]
pub const fn div_round_up(x: u32, y: u32) -> u32 {
    x.div_ceil(y)
}
