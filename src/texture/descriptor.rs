//! Texture descriptors and sampling parameters.
//!
//! A [`TextureDescriptor`] describes the *shape* of a render target: size,
//! format, dimensionality and usage flags. [`SamplingParams`] carries the
//! sampler state that travels with it. Both are plain `Copy` values so they
//! can be rebuilt every frame and compared against what a
//! [`TextureHandle`](super::TextureHandle) was last allocated with.

// ============================================================================
// Depth Bits
// ============================================================================

/// Depth-buffer precision of a render target.
///
/// `None` marks a color target; anything else makes the target a depth
/// buffer whose GPU format is chosen by [`DepthBits::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DepthBits {
    #[default]
    None,
    Depth16,
    Depth24,
    Depth32,
}

impl DepthBits {
    /// Bit count, `0` for color targets.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Depth16 => 16,
            Self::Depth24 => 24,
            Self::Depth32 => 32,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_depth(self) -> bool {
        !matches!(self, Self::None)
    }

    /// GPU depth format for this precision, `None` for color targets.
    #[must_use]
    pub const fn format(self) -> Option<wgpu::TextureFormat> {
        match self {
            Self::None => None,
            Self::Depth16 => Some(wgpu::TextureFormat::Depth16Unorm),
            Self::Depth24 => Some(wgpu::TextureFormat::Depth24PlusStencil8),
            Self::Depth32 => Some(wgpu::TextureFormat::Depth32Float),
        }
    }
}

// ============================================================================
// Texture Descriptor
// ============================================================================

/// Immutable description of a requested render target.
///
/// Two descriptors are considered equivalent by
/// [`needs_reallocation`](super::needs_reallocation), which compares the
/// relevant subset of these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    pub width: u32,
    pub height: u32,
    /// Array layer count for array/cube targets, depth for 3D targets.
    pub volume_depth: u32,
    pub depth_bits: DepthBits,
    /// Color format. Ignored when `depth_bits` is not `None`.
    pub format: wgpu::TextureFormat,
    pub dimension: wgpu::TextureViewDimension,
    /// Target is bound as a storage texture.
    pub enable_random_write: bool,
    pub use_mip_map: bool,
    pub auto_generate_mips: bool,
    pub msaa_samples: u32,
    /// Bind the multisampled surface directly instead of the resolved one.
    pub bind_ms: bool,
    pub use_dynamic_scale: bool,
    /// Contents only live in tile memory for the duration of a pass.
    pub memoryless: bool,
}

impl TextureDescriptor {
    /// A single-sampled 2D color target.
    #[must_use]
    pub const fn color(width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            width,
            height,
            volume_depth: 1,
            depth_bits: DepthBits::None,
            format,
            dimension: wgpu::TextureViewDimension::D2,
            enable_random_write: false,
            use_mip_map: false,
            auto_generate_mips: false,
            msaa_samples: 1,
            bind_ms: false,
            use_dynamic_scale: false,
            memoryless: false,
        }
    }

    /// A single-sampled 2D depth target.
    #[must_use]
    pub const fn depth(width: u32, height: u32, depth_bits: DepthBits) -> Self {
        let mut desc = Self::color(width, height, wgpu::TextureFormat::R8Unorm);
        desc.depth_bits = depth_bits;
        desc
    }

    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn with_msaa(mut self, samples: u32) -> Self {
        self.msaa_samples = samples;
        self
    }

    #[must_use]
    pub const fn with_mips(mut self, auto_generate: bool) -> Self {
        self.use_mip_map = true;
        self.auto_generate_mips = auto_generate;
        self
    }

    #[must_use]
    pub const fn with_random_write(mut self) -> Self {
        self.enable_random_write = true;
        self
    }

    #[must_use]
    pub const fn with_dynamic_scale(mut self) -> Self {
        self.use_dynamic_scale = true;
        self
    }

    /// Turns the target into a cube map (six layers).
    #[must_use]
    pub const fn as_cube(mut self) -> Self {
        self.dimension = wgpu::TextureViewDimension::Cube;
        self.volume_depth = 6;
        self
    }

    /// Turns the target into a 2D array with `layers` slices.
    #[must_use]
    pub const fn as_array(mut self, layers: u32) -> Self {
        self.dimension = wgpu::TextureViewDimension::D2Array;
        self.volume_depth = layers;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_depth(&self) -> bool {
        self.depth_bits.is_depth()
    }

    /// Format the GPU texture is actually created with.
    #[must_use]
    pub const fn effective_format(&self) -> wgpu::TextureFormat {
        match self.depth_bits.format() {
            Some(format) => format,
            None => self.format,
        }
    }

    /// Number of mip levels: the full chain when mips are enabled, else 1.
    #[must_use]
    pub fn mip_level_count(&self) -> u32 {
        if !self.use_mip_map {
            return 1;
        }
        let max_dim = self.width.max(self.height).max(1);
        u32::BITS - max_dim.leading_zeros()
    }
}

// ============================================================================
// Sampling
// ============================================================================

/// Texture filtering quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Nearest texel, nearest mip.
    #[default]
    Point,
    /// Linear within a mip, nearest mip.
    Bilinear,
    /// Linear within and between mips.
    Trilinear,
}

/// Sampler state attached to a render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub filter: FilterMode,
    pub wrap: wgpu::AddressMode,
    /// Depth target sampled with a comparison sampler.
    pub is_shadow_map: bool,
    pub aniso_level: u16,
    pub mip_bias: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            filter: FilterMode::Point,
            wrap: wgpu::AddressMode::Repeat,
            is_shadow_map: false,
            aniso_level: 1,
            mip_bias: 0.0,
        }
    }
}

impl SamplingParams {
    #[must_use]
    pub fn new(filter: FilterMode, wrap: wgpu::AddressMode) -> Self {
        Self {
            filter,
            wrap,
            ..Default::default()
        }
    }

    /// Comparison-sampled depth target.
    #[must_use]
    pub fn shadow_map() -> Self {
        Self {
            filter: FilterMode::Bilinear,
            wrap: wgpu::AddressMode::ClampToEdge,
            is_shadow_map: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_descriptor_uses_depth_format() {
        let desc = TextureDescriptor::depth(128, 128, DepthBits::Depth32);
        assert!(desc.is_depth());
        assert_eq!(desc.effective_format(), wgpu::TextureFormat::Depth32Float);

        let color = TextureDescriptor::color(128, 128, wgpu::TextureFormat::Rgba16Float);
        assert_eq!(color.effective_format(), wgpu::TextureFormat::Rgba16Float);
    }

    #[test]
    fn mip_level_count_covers_full_chain() {
        let desc = TextureDescriptor::color(1920, 1080, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(desc.mip_level_count(), 1);
        assert_eq!(desc.with_mips(true).mip_level_count(), 11);
        assert_eq!(desc.with_size(1, 1).with_mips(false).mip_level_count(), 1);
    }
}
