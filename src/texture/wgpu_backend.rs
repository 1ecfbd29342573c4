//! wgpu implementation of [`TextureAllocator`].
//!
//! Each render target becomes a [`RenderTexture`]: the physical texture, its
//! default view and a sampler built from the target's [`SamplingParams`].

use crate::errors::{RenderUtilsError, Result};

use super::cache::{AllocationRequest, TextureAllocator};
use super::descriptor::{FilterMode, SamplingParams, TextureDescriptor};

/// A render target created by [`WgpuTextureAllocator`].
#[derive(Debug)]
pub struct RenderTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Creates render targets on a `wgpu::Device`.
///
/// Requests are validated against the device limits and the adapter's
/// per-format capabilities before anything is created, so an invalid
/// descriptor surfaces as an error instead of a wgpu validation panic.
pub struct WgpuTextureAllocator {
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    live_textures: usize,
}

impl WgpuTextureAllocator {
    /// `device` must have been requested from `adapter`.
    #[must_use]
    pub fn new(adapter: wgpu::Adapter, device: wgpu::Device) -> Self {
        Self {
            adapter,
            device,
            live_textures: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Number of textures allocated and not yet released.
    #[inline]
    #[must_use]
    pub fn live_texture_count(&self) -> usize {
        self.live_textures
    }
}

/// Checks `desc` against `limits` and the sample counts the host supports.
fn validate_descriptor(
    desc: &TextureDescriptor,
    name: &str,
    limits: &wgpu::Limits,
    sample_count_supported: impl Fn(wgpu::TextureFormat, u32) -> bool,
) -> Result<()> {
    let invalid = |reason: String| RenderUtilsError::InvalidDescriptor {
        name: name.to_owned(),
        reason,
    };

    if desc.width == 0 || desc.height == 0 {
        return Err(RenderUtilsError::EmptyExtent {
            name: name.to_owned(),
            width: desc.width,
            height: desc.height,
        });
    }

    let max = match desc.dimension {
        wgpu::TextureViewDimension::D3 => limits.max_texture_dimension_3d,
        _ => limits.max_texture_dimension_2d,
    };
    if desc.width > max || desc.height > max {
        return Err(RenderUtilsError::TextureTooLarge {
            name: name.to_owned(),
            width: desc.width,
            height: desc.height,
            max,
        });
    }

    let layers = desc.volume_depth;
    match desc.dimension {
        wgpu::TextureViewDimension::D2 => {}
        wgpu::TextureViewDimension::D2Array => {
            if layers == 0 || layers > limits.max_texture_array_layers {
                return Err(invalid(format!(
                    "{layers} array layers, device limit is {}",
                    limits.max_texture_array_layers
                )));
            }
        }
        wgpu::TextureViewDimension::Cube | wgpu::TextureViewDimension::CubeArray => {
            if desc.width != desc.height {
                return Err(invalid(format!(
                    "cube faces must be square, got {}x{}",
                    desc.width, desc.height
                )));
            }
            let single_cube = desc.dimension == wgpu::TextureViewDimension::Cube;
            if layers == 0 || layers % 6 != 0 || (single_cube && layers != 6) {
                return Err(invalid(format!("{layers} layers do not form whole cube faces")));
            }
            if layers > limits.max_texture_array_layers {
                return Err(invalid(format!(
                    "{layers} cube layers, device limit is {}",
                    limits.max_texture_array_layers
                )));
            }
        }
        wgpu::TextureViewDimension::D3 => {
            if layers == 0 || layers > limits.max_texture_dimension_3d {
                return Err(invalid(format!(
                    "volume depth {layers}, device limit is {}",
                    limits.max_texture_dimension_3d
                )));
            }
        }
        other => {
            return Err(invalid(format!("{other:?} render targets are not supported")));
        }
    }

    if desc.enable_random_write && desc.is_depth() {
        return Err(RenderUtilsError::UnsupportedFormat {
            name: name.to_owned(),
            format: desc.effective_format(),
        });
    }

    if desc.msaa_samples > 1 {
        if desc.dimension != wgpu::TextureViewDimension::D2 {
            return Err(invalid(format!(
                "{}x MSAA requires a 2D target, got {:?}",
                desc.msaa_samples, desc.dimension
            )));
        }
        let format = desc.effective_format();
        if !sample_count_supported(format, desc.msaa_samples) {
            return Err(RenderUtilsError::UnsupportedSampleCount {
                name: name.to_owned(),
                format,
                samples: desc.msaa_samples,
            });
        }
    }

    Ok(())
}

impl TextureAllocator for WgpuTextureAllocator {
    type Texture = RenderTexture;

    fn allocate(&mut self, request: &AllocationRequest<'_>) -> Result<RenderTexture> {
        let desc = request.descriptor;
        let adapter = &self.adapter;
        validate_descriptor(desc, request.name, &self.device.limits(), |format, samples| {
            adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(samples)
        })?;

        let (dimension, layers) = match desc.dimension {
            wgpu::TextureViewDimension::D3 => (wgpu::TextureDimension::D3, desc.volume_depth),
            wgpu::TextureViewDimension::D2 => (wgpu::TextureDimension::D2, 1),
            _ => (wgpu::TextureDimension::D2, desc.volume_depth),
        };

        let multisampled = desc.msaa_samples > 1;
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if !multisampled {
            usage |= wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_SRC;
        } else if desc.bind_ms {
            usage |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        if desc.enable_random_write && !multisampled {
            usage |= wgpu::TextureUsages::STORAGE_BINDING;
        }
        if desc.use_mip_map {
            usage |= wgpu::TextureUsages::COPY_DST;
        }
        if desc.memoryless {
            log::trace!(
                "'{}' requested memoryless storage, allocating regular memory",
                request.name
            );
        }

        let mip_level_count = if multisampled { 1 } else { desc.mip_level_count() };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(request.name),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: layers,
            },
            mip_level_count,
            sample_count: desc.msaa_samples.max(1),
            dimension,
            format: desc.effective_format(),
            usage,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(request.name),
            dimension: Some(desc.dimension),
            ..Default::default()
        });

        let sampler = create_sampler(&self.device, request.sampling, request.name);

        self.live_textures += 1;
        Ok(RenderTexture {
            texture,
            view,
            sampler,
        })
    }

    fn release(&mut self, texture: RenderTexture) {
        texture.texture.destroy();
        self.live_textures = self.live_textures.saturating_sub(1);
    }
}

fn create_sampler(device: &wgpu::Device, sampling: &SamplingParams, label: &str) -> wgpu::Sampler {
    let (filter, mipmap_filter) = match sampling.filter {
        FilterMode::Point => (wgpu::FilterMode::Nearest, wgpu::MipmapFilterMode::Nearest),
        FilterMode::Bilinear => (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Nearest),
        FilterMode::Trilinear => (wgpu::FilterMode::Linear, wgpu::MipmapFilterMode::Linear),
    };

    // wgpu only accepts anisotropy with fully linear filtering.
    let anisotropy_clamp = if sampling.filter == FilterMode::Trilinear {
        sampling.aniso_level.clamp(1, 16)
    } else {
        if sampling.aniso_level > 1 {
            log::warn!(
                "'{label}': anisotropy {} ignored for {:?} filtering",
                sampling.aniso_level,
                sampling.filter
            );
        }
        1
    };

    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: sampling.wrap,
        address_mode_v: sampling.wrap,
        address_mode_w: sampling.wrap,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter,
        compare: sampling
            .is_shadow_map
            .then_some(wgpu::CompareFunction::LessEqual),
        anisotropy_clamp,
        ..Default::default()
    })
}
