use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read texture '{path}': {source}")]
    TextureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture '{label}': {source}")]
    TextureDecode {
        label: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
