pub mod camera;
pub mod error;
pub mod gpu_context;
pub mod sprite_pipeline;
pub mod sprite_renderer;
pub mod texture;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use error::RenderError;
pub use gpu_context::GpuContext;
pub use sprite_pipeline::SpritePipeline;
pub use sprite_renderer::{SpriteQuad, SpriteRenderer};
pub use texture::{Texture, TextureId, TextureRegistry};
pub use vertex::SpriteVertex;
