#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod context;
pub mod errors;
pub mod format_support;
pub mod mip_chain;
pub mod screen_space;
pub mod settings;
pub mod texture;

pub use context::RenderUtilsContext;
pub use errors::{RenderUtilsError, Result};
pub use format_support::{AdapterFormatQuery, FormatSupportCache, FormatSupportQuery};
pub use mip_chain::{
    MAX_MIP_LEVELS, OffsetBufferSink, PackedMipChainInfo, PackedMipLayout, WgpuOffsetBuffer,
    compute_packed_mip_layout,
};
pub use screen_space::{
    PhysicalLens, compute_pixel_coord_to_world_space_view_direction_matrix,
    compute_pixel_coord_to_world_space_view_direction_matrix_for_camera,
    compute_viewport_limit, compute_viewport_scale, compute_viewport_scale_and_limit,
    div_round_up, projection_matrix_aspect, screen_size_vector,
};
pub use settings::{DynamicResolution, RenderUtilsSettings};
pub use texture::{
    AllocationRequest, DepthBits, FilterMode, RenderTexture, SamplingParams, ScaleFn, ScalePolicy,
    TextureAllocator, TextureDescriptor, TextureHandle, TextureResourceCache,
    WgpuTextureAllocator, needs_reallocation,
};
