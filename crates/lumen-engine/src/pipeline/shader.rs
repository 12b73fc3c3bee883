use std::borrow::Cow;

use crate::error::{InitResult, InitializationError};

/// Default vertex entry point name.
pub const VERTEX_SHADER: &str = "vertexShader";
/// Default fragment entry point name.
pub const FRAGMENT_SHADER: &str = "fragmentShader";

/// WGSL source for one shader library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: Cow<'static, str>,
    pub wgsl: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(label: impl Into<Cow<'static, str>>, wgsl: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            wgsl: wgsl.into(),
        }
    }

    /// Position + color, no resources.
    pub fn colored() -> Self {
        Self::new("lumen colored", include_str!("shaders/colored.wgsl"))
    }

    /// Position + color + uv; samples a texture/sampler pair at group 0.
    pub fn textured() -> Self {
        Self::new("lumen textured", include_str!("shaders/textured.wgsl"))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Other,
}

/// Scalar type behind a stage input or output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScalarKind {
    Float,
    Sint,
    Uint,
    Bool,
}

/// One user `@location` read or written by an entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StageLocation {
    pub location: u32,
    pub components: u32,
    pub kind: ScalarKind,
}

impl StageLocation {
    pub fn float(location: u32, components: u32) -> Self {
        Self {
            location,
            components,
            kind: ScalarKind::Float,
        }
    }
}

/// Reflected entry point, looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderFunction {
    pub name: String,
    pub stage: ShaderStage,
    /// Vertex stage only; empty for other stages.
    pub inputs: Vec<StageLocation>,
    /// Fragment stage only; empty for other stages.
    pub outputs: Vec<StageLocation>,
    /// `(group, binding)` pairs of resources the entry point touches.
    pub resource_bindings: Vec<(u32, u32)>,
}

/// A loaded shader library: backend module plus its reflected entry points.
#[derive(Debug)]
pub struct ShaderLibrary<M> {
    label: String,
    module: M,
    functions: Vec<ShaderFunction>,
}

impl<M> ShaderLibrary<M> {
    pub fn new(label: impl Into<String>, module: M, functions: Vec<ShaderFunction>) -> Self {
        Self {
            label: label.into(),
            module,
            functions,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn functions(&self) -> &[ShaderFunction] {
        &self.functions
    }

    /// Resolves `name` to an entry point of the given stage.
    ///
    /// A name that exists only under a different stage is reported as not found.
    pub fn function(&self, name: &str, stage: ShaderStage) -> InitResult<&ShaderFunction> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.stage == stage)
            .ok_or_else(|| InitializationError::ShaderFunctionNotFound {
                library: self.label.clone(),
                name: name.to_string(),
            })
    }
}
