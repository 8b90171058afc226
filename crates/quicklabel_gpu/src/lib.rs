//! GPU presentation layer for quicklabel.
//!
//! Uploads CPU-composited RGBA frames as textures and draws them onto a
//! window surface with a single full-screen quad.

pub mod bindings;
pub mod context;
pub mod error;
pub mod frame;
pub mod texture;
pub mod vertex;

pub use context::GpuContext;
pub use error::{GpuError, Result};
pub use frame::FramePipeline;
pub use texture::FrameTexture;
pub use vertex::Vertex;
