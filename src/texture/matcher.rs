//! Handle/descriptor matching.

use super::descriptor::{DepthBits, SamplingParams, TextureDescriptor};
use super::handle::TextureHandle;

/// Returns `true` if `handle` does not satisfy the requested target.
///
/// `scaled` states whether the request follows the reference size; scaled
/// handles skip the width/height comparison because their size is owned by
/// the scaling policy, not the descriptor.
///
/// The color format is only compared for color targets that are not shadow
/// maps. Depth targets get their GPU format from `depth_bits`, and shadow
/// maps are matched on depth precision alone.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn needs_reallocation<T>(
    handle: &TextureHandle<T>,
    descriptor: &TextureDescriptor,
    sampling: &SamplingParams,
    name: &str,
    scaled: bool,
) -> bool {
    let (Some(current), Some(_)) = (handle.descriptor.as_ref(), handle.texture.as_ref()) else {
        return true;
    };
    if handle.uses_scaling() != scaled {
        return true;
    }
    if !scaled && (current.width != descriptor.width || current.height != descriptor.height) {
        return true;
    }

    let format_differs = current.depth_bits == DepthBits::None
        && !sampling.is_shadow_map
        && current.format != descriptor.format;

    current.depth_bits != descriptor.depth_bits
        || format_differs
        || current.dimension != descriptor.dimension
        || current.volume_depth != descriptor.volume_depth
        || current.enable_random_write != descriptor.enable_random_write
        || current.use_mip_map != descriptor.use_mip_map
        || current.auto_generate_mips != descriptor.auto_generate_mips
        || current.msaa_samples != descriptor.msaa_samples
        || current.bind_ms != descriptor.bind_ms
        || current.use_dynamic_scale != descriptor.use_dynamic_scale
        || current.memoryless != descriptor.memoryless
        || handle.sampling.filter != sampling.filter
        || handle.sampling.wrap != sampling.wrap
        || handle.sampling.aniso_level != sampling.aniso_level
        || handle.sampling.mip_bias != sampling.mip_bias
        || handle.name != name
}
