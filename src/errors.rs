//! Error Types
//!
//! This module defines the error types used by the crate.
//!
//! # Overview
//!
//! The pure math in [`crate::screen_space`] and the mip packer never fail.
//! Only the host collaborators can: a texture allocator may refuse a request,
//! and the caller of [`TextureResourceCache::ensure_allocated`] receives that
//! refusal unchanged.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rendering_utils::errors::Result;
//!
//! fn prepare(cache: &mut TextureResourceCache<WgpuTextureAllocator>) -> Result<()> {
//!     let policy = ScalePolicy::Fixed;
//!     cache.ensure_allocated(&mut color, &desc, &sampling, "CameraColor", policy)?;
//!     Ok(())
//! }
//! ```
//!
//! [`TextureResourceCache::ensure_allocated`]:
//!     crate::texture::TextureResourceCache::ensure_allocated

use thiserror::Error;

/// The error type for render-target allocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderUtilsError {
    // ========================================================================
    // Allocation Errors
    // ========================================================================
    /// A texture was requested with a zero-sized extent.
    #[error("Texture '{name}' has an empty extent ({width}x{height})")]
    EmptyExtent {
        /// Name of the requested texture
        name: String,
        width: u32,
        height: u32,
    },

    /// A texture exceeds the device's maximum dimension.
    #[error("Texture '{name}' is {width}x{height}, device limit is {max}")]
    TextureTooLarge {
        /// Name of the requested texture
        name: String,
        width: u32,
        height: u32,
        /// `max_texture_dimension_2d` of the device
        max: u32,
    },

    /// The device cannot use the format for the requested usage.
    #[error("Texture '{name}' uses unsupported format {format:?}")]
    UnsupportedFormat {
        /// Name of the requested texture
        name: String,
        format: wgpu::TextureFormat,
    },

    /// The format does not support the requested multisample count.
    #[error("Texture '{name}' requests {samples}x MSAA, unsupported for {format:?}")]
    UnsupportedSampleCount {
        /// Name of the requested texture
        name: String,
        format: wgpu::TextureFormat,
        samples: u32,
    },

    /// The descriptor's fields contradict each other or the device limits.
    #[error("Texture '{name}' is invalid: {reason}")]
    InvalidDescriptor {
        /// Name of the requested texture
        name: String,
        reason: String,
    },

    /// Any other refusal reported by a host allocator.
    #[error("Texture allocation failed: {0}")]
    AllocationFailed(String),
}

/// Alias for `Result<T, RenderUtilsError>`.
pub type Result<T> = std::result::Result<T, RenderUtilsError>;
