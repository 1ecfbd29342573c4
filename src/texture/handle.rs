//! Render-target handles and scaling policies.

use std::fmt;
use std::sync::Arc;

use glam::{UVec2, Vec2};

use super::descriptor::{SamplingParams, TextureDescriptor};

// ============================================================================
// Scaling Policy
// ============================================================================

/// Size function for scaled targets: maps the reference size to a target size.
///
/// Compared by identity, so two `ScaleFn`s are equal only when they are
/// clones of the same `Arc`.
#[derive(Clone)]
pub struct ScaleFn(Arc<dyn Fn(UVec2) -> UVec2 + Send + Sync>);

impl ScaleFn {
    pub fn new(f: impl Fn(UVec2) -> UVec2 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, reference: UVec2) -> UVec2 {
        (self.0)(reference)
    }
}

impl PartialEq for ScaleFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ScaleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScaleFn({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// How a render target's size is determined.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScalePolicy {
    /// Size comes from the descriptor.
    #[default]
    Fixed,
    /// Size is the reference size multiplied by a constant per-axis factor.
    ConstantFactor(Vec2),
    /// Size is computed from the reference size by a function.
    Function(ScaleFn),
}

impl ScalePolicy {
    /// Whether the target follows the reference size.
    #[inline]
    #[must_use]
    pub fn is_scaled(&self) -> bool {
        !matches!(self, Self::Fixed)
    }

    /// Resolves the allocation size for a target described by `descriptor`.
    ///
    /// Scaled sizes never go below one texel per axis.
    #[must_use]
    pub fn resolve_size(&self, descriptor: &TextureDescriptor, reference: UVec2) -> UVec2 {
        match self {
            Self::Fixed => UVec2::new(descriptor.width, descriptor.height),
            Self::ConstantFactor(factor) => {
                (reference.as_vec2() * *factor).round().as_uvec2().max(UVec2::ONE)
            }
            Self::Function(f) => f.apply(reference).max(UVec2::ONE),
        }
    }
}

// ============================================================================
// Texture Handle
// ============================================================================

/// Owning reference to one render-target resource.
///
/// A handle starts empty and is filled by
/// [`TextureResourceCache::ensure_allocated`](super::TextureResourceCache::ensure_allocated).
/// It remembers what it was allocated with so the next frame's request can be
/// compared against it.
pub struct TextureHandle<T> {
    pub(crate) name: String,
    pub(crate) texture: Option<T>,
    /// Descriptor as allocated, with the resolved size.
    pub(crate) descriptor: Option<TextureDescriptor>,
    pub(crate) sampling: SamplingParams,
    pub(crate) policy: ScalePolicy,
    pub(crate) generation: u64,
    /// Device generation of the cache that allocated `texture`.
    pub(crate) device_generation: u64,
}

impl<T> Default for TextureHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TextureHandle<T> {
    /// Creates an empty, unallocated handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: String::new(),
            texture: None,
            descriptor: None,
            sampling: SamplingParams::default(),
            policy: ScalePolicy::Fixed,
            generation: 0,
            device_generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The live resource, `None` before the first allocation or after a
    /// failed one.
    #[inline]
    #[must_use]
    pub fn texture(&self) -> Option<&T> {
        self.texture.as_ref()
    }

    /// Takes the live resource out of the handle, leaving it unallocated.
    ///
    /// Used to release a texture through the allocator that created it after
    /// the cache switched devices. The next
    /// [`ensure_allocated`](super::TextureResourceCache::ensure_allocated)
    /// allocates a replacement.
    pub fn take_texture(&mut self) -> Option<T> {
        self.descriptor = None;
        self.texture.take()
    }

    #[inline]
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.texture.is_some()
    }

    /// Descriptor of the last allocation, including the resolved size.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> Option<&TextureDescriptor> {
        self.descriptor.as_ref()
    }

    /// Allocated size, `None` before the first allocation.
    #[must_use]
    pub fn size(&self) -> Option<UVec2> {
        self.descriptor.map(|d| UVec2::new(d.width, d.height))
    }

    #[inline]
    #[must_use]
    pub fn sampling(&self) -> &SamplingParams {
        &self.sampling
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> &ScalePolicy {
        &self.policy
    }

    #[inline]
    #[must_use]
    pub fn uses_scaling(&self) -> bool {
        self.policy.is_scaled()
    }

    /// Incremented on every reallocation. Bind groups built against an older
    /// generation reference a released resource.
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Device generation the current texture was allocated on. See
    /// [`TextureResourceCache::device_generation`](super::TextureResourceCache::device_generation).
    #[inline]
    #[must_use]
    pub fn device_generation(&self) -> u64 {
        self.device_generation
    }
}

impl<T> fmt::Debug for TextureHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextureHandle")
            .field("name", &self.name)
            .field("allocated", &self.texture.is_some())
            .field("descriptor", &self.descriptor)
            .field("policy", &self.policy)
            .field("generation", &self.generation)
            .field("device_generation", &self.device_generation)
            .finish_non_exhaustive()
    }
}
