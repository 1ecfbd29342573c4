//! Render-Target Lifecycle
//!
//! - [`TextureDescriptor`] / [`SamplingParams`]: what the pipeline asks for
//! - [`TextureHandle`]: an owned render target plus what it was allocated with
//! - [`needs_reallocation`]: pure handle-vs-request comparison
//! - [`TextureResourceCache`]: per-frame reallocation over a [`TextureAllocator`]
//! - [`WgpuTextureAllocator`]: the wgpu host implementation
//!
//! # Example
//!
//! ```rust,ignore
//! let allocator = WgpuTextureAllocator::new(adapter, device);
//! let mut cache = TextureResourceCache::new(allocator, UVec2::new(2560, 1440));
//! let mut color = TextureHandle::new();
//!
//! // Every frame: a no-op unless the request changed.
//! let desc = TextureDescriptor::color(0, 0, wgpu::TextureFormat::Rgba16Float);
//! let half = ScalePolicy::ConstantFactor(Vec2::splat(0.5));
//! let sampling = SamplingParams::default();
//! cache.ensure_allocated(&mut color, &desc, &sampling, "HalfResColor", half)?;
//! ```

pub mod cache;
pub mod descriptor;
pub mod handle;
pub mod matcher;
pub mod wgpu_backend;

pub use cache::{AllocationRequest, TextureAllocator, TextureResourceCache};
pub use descriptor::{DepthBits, FilterMode, SamplingParams, TextureDescriptor};
pub use handle::{ScaleFn, ScalePolicy, TextureHandle};
pub use matcher::needs_reallocation;
pub use wgpu_backend::{RenderTexture, WgpuTextureAllocator};
