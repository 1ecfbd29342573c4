//! Format Support Cache
//!
//! Memoizes driver capability queries. Asking the adapter about a format is
//! comparatively expensive and the answer never changes for the lifetime of a
//! device, so each distinct key is queried exactly once.
//!
//! The key space (format × usage) is small and finite, so there is no
//! eviction. Call [`FormatSupportCache::reset`] when the device changes.

use rustc_hash::FxHashMap;

/// Host capability query.
pub trait FormatSupportQuery {
    /// Whether `format` can be used as a render target.
    fn render_texture_format_supported(&self, format: wgpu::TextureFormat) -> bool;

    /// Whether `format` supports every usage in `usage`.
    fn graphics_format_supported(
        &self,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> bool;
}

/// [`FormatSupportQuery`] backed by `Adapter::get_texture_format_features`.
pub struct AdapterFormatQuery {
    adapter: wgpu::Adapter,
}

impl AdapterFormatQuery {
    #[must_use]
    pub fn new(adapter: wgpu::Adapter) -> Self {
        Self { adapter }
    }

    #[inline]
    #[must_use]
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }
}

impl FormatSupportQuery for AdapterFormatQuery {
    fn render_texture_format_supported(&self, format: wgpu::TextureFormat) -> bool {
        self.adapter
            .get_texture_format_features(format)
            .allowed_usages
            .contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    }

    fn graphics_format_supported(
        &self,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> bool {
        self.adapter
            .get_texture_format_features(format)
            .allowed_usages
            .contains(usage)
    }
}

/// Lazily populated capability cache over a [`FormatSupportQuery`].
pub struct FormatSupportCache<Q> {
    query: Q,
    render_texture: FxHashMap<wgpu::TextureFormat, bool>,
    graphics: FxHashMap<(wgpu::TextureFormat, wgpu::TextureUsages), bool>,
}

impl<Q: FormatSupportQuery> FormatSupportCache<Q> {
    #[must_use]
    pub fn new(query: Q) -> Self {
        Self {
            query,
            render_texture: FxHashMap::default(),
            graphics: FxHashMap::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn supports_render_texture_format(&mut self, format: wgpu::TextureFormat) -> bool {
        let query = &self.query;
        *self.render_texture.entry(format).or_insert_with(|| {
            let supported = query.render_texture_format_supported(format);
            log::trace!("Render texture format {format:?} supported: {supported}");
            supported
        })
    }

    pub fn supports_graphics_format(
        &mut self,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> bool {
        let query = &self.query;
        *self.graphics.entry((format, usage)).or_insert_with(|| {
            let supported = query.graphics_format_supported(format, usage);
            log::trace!("Format {format:?} with {usage:?} supported: {supported}");
            supported
        })
    }

    /// Forgets every cached answer.
    pub fn reset(&mut self) {
        self.render_texture.clear();
        self.graphics.clear();
    }

    /// Swaps the host query (e.g. after the adapter changed) and resets.
    pub fn replace_query(&mut self, query: Q) -> Q {
        self.reset();
        std::mem::replace(&mut self.query, query)
    }

    /// Number of memoized answers across both maps.
    #[must_use]
    pub fn cached_entry_count(&self) -> usize {
        self.render_texture.len() + self.graphics.len()
    }
}
