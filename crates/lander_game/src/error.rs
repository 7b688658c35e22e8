use std::path::PathBuf;

use lander_render::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("config validation failed: {0}")]
    InvalidConfig(String),
    #[error("invalid entity: {0}")]
    InvalidEntity(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
