//! Pipeline state construction.
//!
//! Shader libraries are reflected with naga so entry points can be resolved by
//! name and checked against the declared vertex layout before any GPU object is
//! created.

mod builder;
mod reflect;
mod shader;

pub use builder::{PipelineBuilder, PipelineDescriptor};
pub use reflect::{reflect_wgsl, shader_capabilities};
pub use shader::{
    FRAGMENT_SHADER, ScalarKind, ShaderFunction, ShaderLibrary, ShaderSource, ShaderStage,
    StageLocation, VERTEX_SHADER,
};
