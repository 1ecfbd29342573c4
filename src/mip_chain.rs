//! Packed Mip Chain
//!
//! Packs every mip level of a pyramid (depth or color) into the top level of
//! a single texture, which sidesteps the power-of-two mip chain restriction
//! for arbitrary viewport sizes.
//!
//! # Layout
//!
//! ```text
//!  ┌───────────────┬───────┐
//!  │               │       │
//!  │   level 0     │ lvl 2 ├───┐
//!  │               │       │ 4 │
//!  ├───────┬───────┴───────┴───┘
//!  │ lvl 1 │ 3 │
//!  └───────┴───┘
//! ```
//!
//! Odd levels go below the previous level, even levels to its right. Each
//! level is half the previous one (rounded up), so consecutive levels never
//! overlap and the bounding box only grows.
//!
//! [`compute_packed_mip_layout`] is the pure geometry. [`PackedMipChainInfo`]
//! wraps it with a memo on its inputs and a dirty flag for the GPU offset
//! table.

use glam::{UVec2, Vec2};

use crate::settings::DynamicResolution;

/// Capacity of the level tables.
pub const MAX_MIP_LEVELS: usize = 15;

// ============================================================================
// Pure Layout
// ============================================================================

/// Geometry of a packed mip chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedMipLayout {
    /// Bounding box of all packed levels.
    pub packed_size: UVec2,
    level_count: usize,
    sizes: [UVec2; MAX_MIP_LEVELS],
    offsets: [UVec2; MAX_MIP_LEVELS],
}

impl Default for PackedMipLayout {
    fn default() -> Self {
        Self {
            packed_size: UVec2::ZERO,
            level_count: 0,
            sizes: [UVec2::ZERO; MAX_MIP_LEVELS],
            offsets: [UVec2::ZERO; MAX_MIP_LEVELS],
        }
    }
}

impl PackedMipLayout {
    #[inline]
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    #[inline]
    #[must_use]
    pub fn level_sizes(&self) -> &[UVec2] {
        &self.sizes[..self.level_count]
    }

    #[inline]
    #[must_use]
    pub fn level_offsets(&self) -> &[UVec2] {
        &self.offsets[..self.level_count]
    }

    /// The whole offset table, unused entries zeroed. This is what the GPU sees.
    #[inline]
    #[must_use]
    pub fn offset_table(&self) -> &[UVec2; MAX_MIP_LEVELS] {
        &self.offsets
    }
}

/// Packs the mip chain of a `base_size` texture.
///
/// Stops at the first 1×1 level (level 0 included), or at [`MAX_MIP_LEVELS`]
/// levels.
#[must_use]
pub fn compute_packed_mip_layout(base_size: UVec2) -> PackedMipLayout {
    let mut layout = PackedMipLayout::default();
    layout.sizes[0] = base_size;
    layout.offsets[0] = UVec2::ZERO;

    let mut bound = base_size;
    let mut mip_size = base_size;
    let mut level = 0;

    while mip_size.x > 1 || mip_size.y > 1 {
        if level + 1 == MAX_MIP_LEVELS {
            log::warn!(
                "Mip chain for {}x{} truncated at {MAX_MIP_LEVELS} levels",
                base_size.x,
                base_size.y
            );
            break;
        }
        level += 1;

        // Round up.
        mip_size = ((mip_size + UVec2::ONE) / 2).max(UVec2::ONE);
        layout.sizes[level] = mip_size;

        let prev_begin = layout.offsets[level - 1];
        let prev_end = prev_begin + layout.sizes[level - 1];

        let begin = if level & 1 != 0 {
            UVec2::new(prev_begin.x, prev_end.y)
        } else {
            UVec2::new(prev_end.x, prev_begin.y)
        };
        layout.offsets[level] = begin;

        bound = bound.max(begin + mip_size);
    }

    layout.level_count = level + 1;
    layout.packed_size = bound;
    layout
}

// ============================================================================
// Offset Buffer
// ============================================================================

/// GPU-visible destination for the mip offset table.
pub trait OffsetBufferSink {
    fn set_data(&mut self, offsets: &[UVec2]);
}

/// Offset table stored in a `wgpu` storage buffer.
pub struct WgpuOffsetBuffer {
    buffer: wgpu::Buffer,
    queue: wgpu::Queue,
}

impl WgpuOffsetBuffer {
    /// Creates a buffer sized for [`MAX_MIP_LEVELS`] offsets.
    #[must_use]
    pub fn new(device: &wgpu::Device, queue: wgpu::Queue, label: &str) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<[UVec2; MAX_MIP_LEVELS]>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, queue }
    }

    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl OffsetBufferSink for WgpuOffsetBuffer {
    fn set_data(&mut self, offsets: &[UVec2]) {
        self.queue
            .write_buffer(&self.buffer, 0, bytemuck::cast_slice(offsets));
    }
}

// ============================================================================
// Memoized Chain State
// ============================================================================

/// Packed mip chain of one pyramid texture, recomputed only when its inputs
/// change.
#[derive(Debug, Clone)]
pub struct PackedMipChainInfo {
    layout: PackedMipLayout,
    /// Size to allocate the packed texture with.
    texture_size: UVec2,
    cached_hardware_size: UVec2,
    cached_texture_scale: Vec2,
    offsets_dirty: bool,
}

impl Default for PackedMipChainInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedMipChainInfo {
    /// Creates empty level tables; the offset table starts dirty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: PackedMipLayout::default(),
            texture_size: UVec2::ZERO,
            cached_hardware_size: UVec2::ZERO,
            cached_texture_scale: Vec2::ZERO,
            offsets_dirty: true,
        }
    }

    /// Recomputes the chain for `viewport_size` if needed.
    ///
    /// Returns `true` if the layout was recomputed, `false` when the hardware
    /// size and dynamic resolution scale match the previous call.
    pub fn compute(
        &mut self,
        viewport_size: UVec2,
        dynamic_resolution: &DynamicResolution,
    ) -> bool {
        let (hardware_size, texture_scale) = if dynamic_resolution.hardware_enabled {
            let hardware = dynamic_resolution.apply_scales_on_size(viewport_size);
            (hardware, viewport_size.as_vec2() / hardware.as_vec2())
        } else {
            (viewport_size, Vec2::ONE)
        };

        if self.cached_hardware_size == hardware_size
            && self.cached_texture_scale == texture_scale
        {
            return false;
        }
        self.cached_hardware_size = hardware_size;
        self.cached_texture_scale = texture_scale;

        self.layout = compute_packed_mip_layout(hardware_size);
        self.texture_size = (self.layout.packed_size.as_vec2() * texture_scale)
            .ceil()
            .as_uvec2();
        self.offsets_dirty = true;

        log::trace!(
            "Packed mip chain {}x{}: {} levels in {}x{}",
            hardware_size.x,
            hardware_size.y,
            self.layout.level_count(),
            self.texture_size.x,
            self.texture_size.y
        );
        true
    }

    /// Uploads the offset table into `buffer` if it changed since the last
    /// upload, and returns `buffer`.
    pub fn offset_buffer_data<'b, B: OffsetBufferSink>(&mut self, buffer: &'b mut B) -> &'b mut B {
        if self.offsets_dirty {
            buffer.set_data(self.layout.offset_table());
            self.offsets_dirty = false;
        }
        buffer
    }

    #[inline]
    #[must_use]
    pub fn needs_offset_upload(&self) -> bool {
        self.offsets_dirty
    }

    #[inline]
    #[must_use]
    pub fn layout(&self) -> &PackedMipLayout {
        &self.layout
    }

    /// Size the packed texture must be allocated with.
    #[inline]
    #[must_use]
    pub fn texture_size(&self) -> UVec2 {
        self.texture_size
    }

    #[inline]
    #[must_use]
    pub fn mip_level_count(&self) -> usize {
        self.layout.level_count()
    }

    #[inline]
    #[must_use]
    pub fn mip_level_sizes(&self) -> &[UVec2] {
        self.layout.level_sizes()
    }

    #[inline]
    #[must_use]
    pub fn mip_level_offsets(&self) -> &[UVec2] {
        self.layout.level_offsets()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_texel_is_one_level() {
        let layout = compute_packed_mip_layout(UVec2::ONE);
        assert_eq!(layout.level_count(), 1);
        assert_eq!(layout.level_sizes(), &[UVec2::ONE]);
        assert_eq!(layout.level_offsets(), &[UVec2::ZERO]);
        assert_eq!(layout.packed_size, UVec2::ONE);
    }

    #[test]
    fn unused_offsets_stay_zero() {
        let layout = compute_packed_mip_layout(UVec2::new(4, 4));
        assert_eq!(layout.level_count(), 3);
        assert!(layout.offset_table()[3..].iter().all(|o| *o == UVec2::ZERO));
    }
}
