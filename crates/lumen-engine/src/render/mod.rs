//! Frame rendering.
//!
//! One [`Renderer`] draws one static geometry per frame into the backend's
//! drawable:
//! - a single render pass cleared to opaque black
//! - one draw call, indexed or not
//! - submit, then schedule presentation
//!
//! Geometry is already in normalized device coordinates, so surface resizes
//! never touch renderer state.

mod config;
mod pass;
mod renderer;
mod stats;

pub use config::{RendererConfig, TextureSource};
pub use pass::PassDescriptor;
pub use renderer::Renderer;
pub use stats::FrameStats;
