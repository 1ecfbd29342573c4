//! wgpu Backend Tests
//!
//! Runs the wgpu host implementations against a real adapter. Skipped when
//! the machine has no adapter (headless CI without a software rasterizer).

use glam::UVec2;

use rendering_utils::RenderUtilsError;
use rendering_utils::context::RenderUtilsContext;
use rendering_utils::mip_chain::{PackedMipChainInfo, WgpuOffsetBuffer};
use rendering_utils::settings::RenderUtilsSettings;
use rendering_utils::texture::{
    DepthBits, FilterMode, SamplingParams, ScalePolicy, TextureDescriptor, TextureHandle,
};

fn request_device() -> Option<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let _ = env_logger::builder().is_test(true).try_init();

    let instance = wgpu::Instance::default();
    let options = wgpu::RequestAdapterOptions::default();
    let adapter = pollster::block_on(instance.request_adapter(&options)).ok()?;
    let descriptor = wgpu::DeviceDescriptor::default();
    let (device, queue) = pollster::block_on(adapter.request_device(&descriptor)).ok()?;
    Some((adapter, device, queue))
}

#[test]
fn allocates_and_releases_render_targets() {
    let Some((adapter, device, _queue)) = request_device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };
    let mut ctx = RenderUtilsContext::for_wgpu(adapter, device, RenderUtilsSettings::default());

    let mut color = TextureHandle::new();
    let mut depth = TextureHandle::new();
    let linear = SamplingParams::new(FilterMode::Trilinear, wgpu::AddressMode::ClampToEdge);

    ctx.textures
        .ensure_allocated(
            &mut color,
            &TextureDescriptor::color(256, 128, wgpu::TextureFormat::Rgba8Unorm).with_mips(false),
            &linear,
            "Color",
            ScalePolicy::Fixed,
        )
        .unwrap();
    ctx.textures
        .ensure_allocated(
            &mut depth,
            &TextureDescriptor::depth(256, 128, DepthBits::Depth32),
            &SamplingParams::shadow_map(),
            "Shadow",
            ScalePolicy::Fixed,
        )
        .unwrap();

    let texture = &color.texture().unwrap().texture;
    assert_eq!(texture.width(), 256);
    assert_eq!(texture.mip_level_count(), 9);
    assert_eq!(depth.texture().unwrap().texture.format(), wgpu::TextureFormat::Depth32Float);
    assert_eq!(ctx.textures.allocator().live_texture_count(), 2);

    assert!(ctx.textures.release(&mut color));
    assert!(ctx.textures.release(&mut depth));
    assert_eq!(ctx.textures.allocator().live_texture_count(), 0);
}

#[test]
fn rejects_invalid_requests() {
    let Some((adapter, device, _queue)) = request_device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };
    let max = device.limits().max_texture_dimension_2d;
    let mut ctx = RenderUtilsContext::for_wgpu(adapter, device, RenderUtilsSettings::default());
    let mut handle = TextureHandle::new();
    let sampling = SamplingParams::default();

    let empty = ctx.textures.ensure_allocated(
        &mut handle,
        &TextureDescriptor::color(0, 16, wgpu::TextureFormat::Rgba8Unorm),
        &sampling,
        "Empty",
        ScalePolicy::Fixed,
    );
    assert!(matches!(empty, Err(RenderUtilsError::EmptyExtent { .. })));

    let huge = ctx.textures.ensure_allocated(
        &mut handle,
        &TextureDescriptor::color(max + 1, 16, wgpu::TextureFormat::Rgba8Unorm),
        &sampling,
        "Huge",
        ScalePolicy::Fixed,
    );
    assert!(matches!(huge, Err(RenderUtilsError::TextureTooLarge { .. })));
    assert!(!handle.is_allocated());
}

#[test]
fn rejects_invalid_descriptors_without_panicking() {
    let Some((adapter, device, _queue)) = request_device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };
    let mut ctx = RenderUtilsContext::for_wgpu(adapter, device, RenderUtilsSettings::default());
    let mut handle = TextureHandle::new();
    let sampling = SamplingParams::default();

    let cube = ctx.textures.ensure_allocated(
        &mut handle,
        &TextureDescriptor::color(960, 540, wgpu::TextureFormat::Rgba8Unorm).as_cube(),
        &sampling,
        "Reflection",
        ScalePolicy::Fixed,
    );
    assert!(matches!(cube, Err(RenderUtilsError::InvalidDescriptor { .. })));

    let msaa = ctx.textures.ensure_allocated(
        &mut handle,
        &TextureDescriptor::color(64, 64, wgpu::TextureFormat::Rgba8Unorm).with_msaa(3),
        &sampling,
        "Msaa",
        ScalePolicy::Fixed,
    );
    assert!(matches!(msaa, Err(RenderUtilsError::UnsupportedSampleCount { .. })));
    assert!(!handle.is_allocated());
    assert_eq!(ctx.textures.allocator().live_texture_count(), 0);
}

#[test]
fn adapter_reports_render_formats() {
    let Some((adapter, device, _queue)) = request_device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };
    let mut ctx = RenderUtilsContext::for_wgpu(adapter, device, RenderUtilsSettings::default());

    assert!(ctx.formats.supports_render_texture_format(wgpu::TextureFormat::Rgba8Unorm));
    assert!(ctx.formats.supports_graphics_format(
        wgpu::TextureFormat::Rgba8Unorm,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    ));
    assert_eq!(ctx.formats.cached_entry_count(), 2);
}

#[test]
fn uploads_mip_offsets() {
    let Some((_adapter, device, queue)) = request_device() else {
        eprintln!("No wgpu adapter available, skipping");
        return;
    };
    let mut offsets = WgpuOffsetBuffer::new(&device, queue, "DepthPyramidOffsets");
    let mut chain = PackedMipChainInfo::new();
    chain.compute(UVec2::new(1280, 720), &RenderUtilsSettings::default().dynamic_resolution);

    chain.offset_buffer_data(&mut offsets);
    assert!(!chain.needs_offset_upload());
    assert_eq!(offsets.buffer().size(), 15 * 8);
}
