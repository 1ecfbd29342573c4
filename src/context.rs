//! Render Utils Context
//!
//! The [`RenderUtilsContext`] bundles the per-device caches a render pipeline
//! keeps alive between frames:
//!
//! - `textures`: persistent render-target reallocation ([`TextureResourceCache`])
//! - `formats`: memoized format capability queries ([`FormatSupportCache`])
//! - `settings`: the [`RenderUtilsSettings`] it was built with
//!
//! Nothing here is global. The pipeline owns the context and calls
//! [`device_changed`](RenderUtilsContext::device_changed) when the GPU device
//! is recreated.

use glam::UVec2;

use crate::format_support::{AdapterFormatQuery, FormatSupportCache, FormatSupportQuery};
use crate::mip_chain::PackedMipChainInfo;
use crate::settings::RenderUtilsSettings;
use crate::texture::{TextureAllocator, TextureResourceCache, WgpuTextureAllocator};

/// Owned bundle of the render-target and format caches.
pub struct RenderUtilsContext<A: TextureAllocator, Q: FormatSupportQuery> {
    pub textures: TextureResourceCache<A>,
    pub formats: FormatSupportCache<Q>,
    pub settings: RenderUtilsSettings,
}

impl<A: TextureAllocator, Q: FormatSupportQuery> RenderUtilsContext<A, Q> {
    #[must_use]
    pub fn new(allocator: A, query: Q, settings: RenderUtilsSettings) -> Self {
        Self {
            textures: TextureResourceCache::new(allocator, settings.reference_size),
            formats: FormatSupportCache::new(query),
            settings,
        }
    }

    /// Switches both caches to a new device.
    ///
    /// Every cached format answer is dropped. Handles still holding a render
    /// target from the old device are reallocated on their next
    /// `ensure_allocated`, and the stale texture is dropped. Callers that need
    /// an explicit release take it with
    /// [`TextureHandle::take_texture`](crate::texture::TextureHandle::take_texture)
    /// and hand it to the returned allocator.
    pub fn device_changed(&mut self, allocator: A, query: Q) -> A {
        log::info!("Device changed, resetting render utils caches");
        self.formats.replace_query(query);
        self.textures.replace_allocator(allocator)
    }

    /// Updates the reference size for scaled render targets.
    pub fn set_reference_size(&mut self, size: UVec2) {
        self.settings.reference_size = size;
        self.textures.set_reference_size(size);
    }

    /// Recomputes `chain` for `viewport_size` under the current dynamic
    /// resolution settings. See [`PackedMipChainInfo::compute`].
    pub fn compute_mip_chain(&self, chain: &mut PackedMipChainInfo, viewport_size: UVec2) -> bool {
        chain.compute(viewport_size, &self.settings.dynamic_resolution)
    }
}

impl RenderUtilsContext<WgpuTextureAllocator, AdapterFormatQuery> {
    /// Builds a context over a wgpu adapter and the device created from it.
    #[must_use]
    pub fn for_wgpu(
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        settings: RenderUtilsSettings,
    ) -> Self {
        Self::new(
            WgpuTextureAllocator::new(adapter.clone(), device),
            AdapterFormatQuery::new(adapter),
            settings,
        )
    }
}
