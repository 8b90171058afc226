use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Window surface reports no texture formats")]
    NoSurfaceFormat,

    #[error("Frame of {width}x{height} needs {expected} bytes, got {actual}")]
    FrameSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, GpuError>;
