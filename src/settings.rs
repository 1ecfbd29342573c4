//! Settings & Dynamic Resolution
//!
//! Plain configuration values consumed once when a
//! [`RenderUtilsContext`](crate::context::RenderUtilsContext) or a
//! [`TextureResourceCache`](crate::texture::TextureResourceCache) is built.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rendering_utils::settings::{DynamicResolution, RenderUtilsSettings};
//!
//! let settings = RenderUtilsSettings {
//!     reference_size: UVec2::new(2560, 1440),
//!     dynamic_resolution: DynamicResolution::hardware(Vec2::splat(0.75)),
//!     ..Default::default()
//! };
//! ```

use glam::{UVec2, Vec2};

use crate::texture::SamplingParams;

// ---------------------------------------------------------------------------
// DynamicResolution
// ---------------------------------------------------------------------------

/// Runtime resolution scaling state.
///
/// When `hardware_enabled` is set, render targets keep their allocated size
/// and the renderer draws into a `scale`-sized sub-rectangle of them. Passes
/// that derive sizes from the viewport (such as the packed mip chain) must go
/// through [`apply_scales_on_size`](Self::apply_scales_on_size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicResolution {
    /// Hardware dynamic resolution is active.
    pub hardware_enabled: bool,
    /// Per-axis scale applied to the viewport. `(1, 1)` renders at full size.
    pub scale: Vec2,
}

impl Default for DynamicResolution {
    #[inline]
    fn default() -> Self {
        Self::disabled()
    }
}

impl DynamicResolution {
    /// Dynamic resolution off: sizes are used unchanged.
    #[inline]
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            hardware_enabled: false,
            scale: Vec2::ONE,
        }
    }

    /// Hardware dynamic resolution at the given per-axis scale.
    #[inline]
    #[must_use]
    pub const fn hardware(scale: Vec2) -> Self {
        Self {
            hardware_enabled: true,
            scale,
        }
    }

    /// Applies the current scale to `size`, rounding up and never going
    /// below one texel per axis.
    #[must_use]
    pub fn apply_scales_on_size(&self, size: UVec2) -> UVec2 {
        let scaled = (size.as_vec2() * self.scale).ceil().as_uvec2();
        scaled.max(UVec2::ONE)
    }
}

// ---------------------------------------------------------------------------
// RenderUtilsSettings
// ---------------------------------------------------------------------------

/// Configuration for a [`RenderUtilsContext`](crate::context::RenderUtilsContext).
///
/// | Field                | Description                                    | Default      |
/// |----------------------|------------------------------------------------|--------------|
/// | `reference_size`     | Size scaled render targets are derived from    | 1920×1080    |
/// | `dynamic_resolution` | Runtime resolution scaling state               | disabled     |
/// | `default_sampling`   | Sampling used when a caller has no preference  | point/repeat |
#[derive(Debug, Clone, PartialEq)]
pub struct RenderUtilsSettings {
    /// Reference (maximum) render size. Scaled targets are sized relative to it.
    pub reference_size: UVec2,
    /// Dynamic resolution state used by the packed mip chain.
    pub dynamic_resolution: DynamicResolution,
    /// Default sampling parameters for new targets.
    pub default_sampling: SamplingParams,
}

impl Default for RenderUtilsSettings {
    fn default() -> Self {
        Self {
            reference_size: UVec2::new(1920, 1080),
            dynamic_resolution: DynamicResolution::disabled(),
            default_sampling: SamplingParams::default(),
        }
    }
}
