use crate::backend::Backend;
use crate::error::{InitResult, InitializationError};
use crate::geometry::VertexLayout;

use super::shader::{
    FRAGMENT_SHADER, ScalarKind, ShaderFunction, ShaderLibrary, ShaderStage, VERTEX_SHADER,
};

/// Resolved, link-checked inputs handed to [`Backend::create_pipeline`].
pub struct PipelineDescriptor<'a, M> {
    pub label: &'a str,
    pub library: &'a ShaderLibrary<M>,
    pub vertex: &'a ShaderFunction,
    pub fragment: &'a ShaderFunction,
    pub vertex_layout: VertexLayout,
    pub output_format: wgpu::TextureFormat,
    /// Whether a texture/sampler pair is bound at group 0.
    pub textured: bool,
}

/// Builds an immutable pipeline state from a named shader pair.
///
/// Entry points are resolved by string at build time, so swapping shaders only
/// requires a library with matching names.
#[derive(Debug, Clone)]
pub struct PipelineBuilder<'a> {
    label: &'a str,
    vertex_shader: &'a str,
    fragment_shader: &'a str,
    vertex_layout: VertexLayout,
    textured: bool,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            vertex_shader: VERTEX_SHADER,
            fragment_shader: FRAGMENT_SHADER,
            vertex_layout: VertexLayout::Colored,
            textured: false,
        }
    }

    pub fn entry_points(mut self, vertex: &'a str, fragment: &'a str) -> Self {
        self.vertex_shader = vertex;
        self.fragment_shader = fragment;
        self
    }

    pub fn vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.vertex_layout = layout;
        self
    }

    pub fn textured(mut self, textured: bool) -> Self {
        self.textured = textured;
        self
    }

    pub fn build<B: Backend>(
        &self,
        backend: &B,
        library: &ShaderLibrary<B::ShaderModule>,
        output_format: wgpu::TextureFormat,
    ) -> InitResult<B::Pipeline> {
        let vertex = library.function(self.vertex_shader, ShaderStage::Vertex)?;
        let fragment = library.function(self.fragment_shader, ShaderStage::Fragment)?;

        self.check_vertex_inputs(vertex)?;
        self.check_resources(vertex)?;
        self.check_resources(fragment)?;
        self.check_output_format(output_format)?;
        self.check_fragment_output(fragment, output_format)?;

        let pipeline = backend.create_pipeline(&PipelineDescriptor {
            label: self.label,
            library,
            vertex,
            fragment,
            vertex_layout: self.vertex_layout,
            output_format,
            textured: self.textured,
        })?;

        log::debug!(
            "pipeline `{}` built ({} + {}, {:?})",
            self.label,
            vertex.name,
            fragment.name,
            output_format
        );
        Ok(pipeline)
    }

    fn link_failed(&self, reason: String) -> InitializationError {
        InitializationError::PipelineLinkFailed {
            label: self.label.to_string(),
            reason,
        }
    }

    fn check_vertex_inputs(&self, vertex: &ShaderFunction) -> InitResult<()> {
        let attrs = self.vertex_layout.attributes();

        for input in &vertex.inputs {
            let Some(attr) = attrs.iter().find(|a| a.shader_location == input.location) else {
                return Err(self.link_failed(format!(
                    "`{}` reads location {} which the {:?} vertex layout does not provide",
                    vertex.name, input.location, self.vertex_layout
                )));
            };

            // Float32xN formats only: N = size / 4.
            if input.kind != ScalarKind::Float {
                return Err(self.link_failed(format!(
                    "location {} is {:?} but the layout provides {:?}",
                    input.location, input.kind, attr.format
                )));
            }
            let provided = (attr.format.size() / 4) as u32;
            if provided != input.components {
                return Err(self.link_failed(format!(
                    "location {} expects {} components, layout provides {:?}",
                    input.location, input.components, attr.format
                )));
            }
        }

        Ok(())
    }

    fn check_resources(&self, function: &ShaderFunction) -> InitResult<()> {
        if self.textured {
            if let Some((group, binding)) = function
                .resource_bindings
                .iter()
                .copied()
                .find(|&(g, b)| g != 0 || b > 1)
            {
                return Err(self.link_failed(format!(
                    "`{}` uses @group({group}) @binding({binding}); only the group 0 texture/sampler pair is bound",
                    function.name
                )));
            }
        } else if let Some((group, binding)) = function.resource_bindings.first().copied() {
            return Err(self.link_failed(format!(
                "`{}` uses @group({group}) @binding({binding}) but the pipeline binds no resources",
                function.name
            )));
        }
        Ok(())
    }

    fn check_output_format(&self, format: wgpu::TextureFormat) -> InitResult<()> {
        if format.is_depth_stencil_format() || format.is_compressed() {
            return Err(self.link_failed(format!("{format:?} is not a color-renderable format")));
        }
        Ok(())
    }

    /// The single color target is written through `@location(0)`.
    fn check_fragment_output(
        &self,
        fragment: &ShaderFunction,
        format: wgpu::TextureFormat,
    ) -> InitResult<()> {
        let Some(color) = fragment.outputs.iter().find(|o| o.location == 0) else {
            return Err(self.link_failed(format!(
                "`{}` writes no @location(0) output for the color target",
                fragment.name
            )));
        };

        let expected = match format.sample_type(None, None) {
            Some(wgpu::TextureSampleType::Sint) => ScalarKind::Sint,
            Some(wgpu::TextureSampleType::Uint) => ScalarKind::Uint,
            _ => ScalarKind::Float,
        };
        if color.kind != expected {
            return Err(self.link_failed(format!(
                "`{}` writes {:?} at @location(0), {format:?} needs {expected:?}",
                fragment.name, color.kind
            )));
        }

        let channels = u32::from(format.components());
        if color.components < channels {
            return Err(self.link_failed(format!(
                "`{}` writes {} components at @location(0), {format:?} has {channels}",
                fragment.name, color.components
            )));
        }

        Ok(())
    }
}
