//! Shader binding constants.
//!
//! Binding numbers shared between Rust code and `shaders/frame.wgsl`.
//!
//! ```wgsl
//! @group(0) @binding(0)  // FRAME_GROUP, TEXTURE_BINDING
//! var frame_texture: texture_2d<f32>;
//! ```

/// Group 0: frame texture resources
pub const FRAME_GROUP: u32 = 0;
/// Binding 0 in group 0: Texture 2D
pub const TEXTURE_BINDING: u32 = 0;
/// Binding 1 in group 0: Sampler
pub const SAMPLER_BINDING: u32 = 1;
