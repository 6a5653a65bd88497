//! Error types for driftfield.
//!
//! The simulation cores never fail; errors only come from loading
//! configuration, bringing up the GPU and window, and writing frames to disk.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for the expected schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A palette entry is not a `#rrggbb` / `#rgb` color.
    #[error("invalid color {0:?}, expected #rrggbb or #rgb")]
    InvalidColor(String),
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a WebGPU/Vulkan/Metal/DX12 capable device is required")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("GPU surface exposes no texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the backdrop, windowed or headless.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Writing a rendered frame failed.
    #[error("failed to export frame: {0}")]
    Export(#[from] image::ImageError),
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
