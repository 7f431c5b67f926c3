//! Projection and WebGPU rendering
//!
//! - `projector`/`camera`: state → backend-independent `DrawList`
//! - `shapes`/`pipeline`: fill geometry drawn with wgpu
//! - `text`: labels and readout for the DOM overlay

pub mod camera;
pub mod draw;
pub mod pipeline;
pub mod projector;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use camera::{Camera, CameraPolicy};
pub use draw::{Color, DrawCommand, DrawList};
pub use pipeline::RenderState;
pub use projector::Projector;
pub use text::{TextItem, text_items};
