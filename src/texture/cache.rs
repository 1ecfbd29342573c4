//! Texture Resource Cache
//!
//! Keeps persistent render targets (camera color, depth, history buffers…)
//! matched to the descriptor the pipeline requests each frame. A target is
//! only reallocated when the request no longer matches what its handle holds.
//!
//! # Design
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              TextureResourceCache<A>                     │
//! │                                                          │
//! │  allocator:      A: TextureAllocator  (host seam)        │
//! │  reference_size: UVec2                (scaled targets)   │
//! │                                                          │
//! │  ensure_allocated(&mut handle, ..) → bool  (per frame)   │
//! │  release(&mut handle)               (teardown)           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are owned by the subsystem that registered them; the cache only
//! owns the allocation policy.
//!
//! # Reallocation Order
//!
//! The previous resource is always released **before** the replacement is
//! requested. A resolution change touches many targets in the same frame and
//! acquire-then-release would briefly double their footprint.

use glam::UVec2;

use crate::errors::Result;

use super::descriptor::{SamplingParams, TextureDescriptor};
use super::handle::{ScalePolicy, TextureHandle};
use super::matcher::needs_reallocation;

// ─── Host Seam ────────────────────────────────────────────────────────────────

/// Everything a host needs to create one render target.
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest<'a> {
    /// Descriptor with the size already resolved by the scaling policy.
    pub descriptor: &'a TextureDescriptor,
    pub sampling: &'a SamplingParams,
    pub name: &'a str,
}

/// Host graphics layer that creates and destroys render targets.
pub trait TextureAllocator {
    type Texture;

    /// Creates a texture for `request`.
    fn allocate(&mut self, request: &AllocationRequest<'_>) -> Result<Self::Texture>;

    /// Destroys a texture previously returned by [`allocate`](Self::allocate).
    fn release(&mut self, texture: Self::Texture);
}

// ─── Cache ────────────────────────────────────────────────────────────────────

/// Reallocation policy for persistent render targets.
///
/// # Thread Safety
///
/// All methods take `&mut self` and are meant to be called from the render
/// thread only. Handles are passed in by `&mut`, so a handle can never be
/// reallocated while something else borrows its texture.
pub struct TextureResourceCache<A: TextureAllocator> {
    allocator: A,
    reference_size: UVec2,
    device_generation: u64,
}

impl<A: TextureAllocator> TextureResourceCache<A> {
    /// Creates a cache over `allocator`. Scaled targets are sized relative to
    /// `reference_size`.
    #[must_use]
    pub fn new(allocator: A, reference_size: UVec2) -> Self {
        Self {
            allocator,
            reference_size,
            device_generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    #[inline]
    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    /// Swaps the host allocator, returning the previous one.
    ///
    /// Bumps the device generation. Handles still holding a texture from the
    /// previous allocator are reallocated on their next
    /// [`ensure_allocated`](Self::ensure_allocated); their stale texture is
    /// dropped, never passed to the new allocator. To release it through the
    /// returned allocator instead, take it out first with
    /// [`TextureHandle::take_texture`].
    pub fn replace_allocator(&mut self, allocator: A) -> A {
        self.device_generation = self.device_generation.wrapping_add(1);
        log::debug!("Texture allocator replaced, device generation {}", self.device_generation);
        std::mem::replace(&mut self.allocator, allocator)
    }

    /// Incremented by every [`replace_allocator`](Self::replace_allocator).
    #[inline]
    #[must_use]
    pub fn device_generation(&self) -> u64 {
        self.device_generation
    }

    #[inline]
    #[must_use]
    pub fn reference_size(&self) -> UVec2 {
        self.reference_size
    }

    /// Updates the reference size scaled targets are derived from.
    ///
    /// Scaled targets pick up the new size on their next
    /// [`ensure_allocated`](Self::ensure_allocated).
    pub fn set_reference_size(&mut self, size: UVec2) {
        self.reference_size = size;
    }

    // ── Per-frame ──────────────────────────────────────────────────────────

    /// Ensures `handle` holds a texture matching the request.
    ///
    /// Returns `Ok(true)` when a reallocation happened and `Ok(false)` when the
    /// existing texture was kept, in which case the allocator is not called at
    /// all.
    ///
    /// Scaled targets are also reallocated when the size their policy resolves
    /// to against the current reference size differs from their allocated
    /// size. Handles allocated before the last allocator swap are always
    /// reallocated.
    ///
    /// When the allocator fails, the handle is still updated to describe the
    /// request (name, policy, sampling, descriptor, generation) but holds no
    /// texture, and the allocator's error is returned.
    pub fn ensure_allocated(
        &mut self,
        handle: &mut TextureHandle<A::Texture>,
        descriptor: &TextureDescriptor,
        sampling: &SamplingParams,
        name: &str,
        policy: ScalePolicy,
    ) -> Result<bool> {
        let same_policy = match (&policy, &handle.policy) {
            (ScalePolicy::Fixed, _) => true,
            (ScalePolicy::ConstantFactor(requested), ScalePolicy::ConstantFactor(current)) => {
                requested == current
            }
            (ScalePolicy::Function(requested), ScalePolicy::Function(current)) => {
                requested == current
            }
            _ => false,
        };
        let same_size = !policy.is_scaled()
            || handle.size() == Some(policy.resolve_size(descriptor, self.reference_size));
        let same_device = handle.device_generation == self.device_generation;

        if same_policy
            && same_size
            && same_device
            && !needs_reallocation(handle, descriptor, sampling, name, policy.is_scaled())
        {
            return Ok(false);
        }

        self.reallocate(handle, descriptor, sampling, name, policy)?;
        Ok(true)
    }

    fn reallocate(
        &mut self,
        handle: &mut TextureHandle<A::Texture>,
        descriptor: &TextureDescriptor,
        sampling: &SamplingParams,
        name: &str,
        policy: ScalePolicy,
    ) -> Result<()> {
        self.release_texture(handle);

        let size = policy.resolve_size(descriptor, self.reference_size);
        let resolved = descriptor.with_size(size.x, size.y);

        handle.name.clear();
        handle.name.push_str(name);
        handle.descriptor = Some(resolved);
        handle.sampling = *sampling;
        handle.policy = policy;
        handle.generation = handle.generation.wrapping_add(1);
        handle.device_generation = self.device_generation;

        let request = AllocationRequest {
            descriptor: &resolved,
            sampling,
            name,
        };
        match self.allocator.allocate(&request) {
            Ok(texture) => {
                log::debug!(
                    "Allocated render target '{}' {}x{} ({:?}, generation {})",
                    name,
                    size.x,
                    size.y,
                    handle.policy,
                    handle.generation
                );
                handle.texture = Some(texture);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to allocate render target '{name}': {err}");
                Err(err)
            }
        }
    }

    /// Releases the handle's texture through the current allocator, or drops
    /// it if it belongs to a previous one.
    fn release_texture(&mut self, handle: &mut TextureHandle<A::Texture>) -> bool {
        let Some(texture) = handle.texture.take() else {
            return false;
        };
        if handle.device_generation == self.device_generation {
            self.allocator.release(texture);
        } else {
            log::debug!(
                "Dropping render target '{}' from device generation {}",
                handle.name,
                handle.device_generation
            );
        }
        true
    }

    // ── Teardown ───────────────────────────────────────────────────────────

    /// Releases the texture held by `handle`, leaving it empty.
    ///
    /// Returns `true` if the handle held a texture. A texture from a previous
    /// allocator is dropped rather than released.
    pub fn release(&mut self, handle: &mut TextureHandle<A::Texture>) -> bool {
        if !self.release_texture(handle) {
            return false;
        }
        log::debug!("Released render target '{}'", handle.name);
        handle.descriptor = None;
        true
    }
}
