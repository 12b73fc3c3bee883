//! GPU backend seam.
//!
//! Everything above this module (pipeline builder, uploader, frame renderer) is
//! written against [`Backend`]. The production implementation is
//! [`crate::device::WgpuBackend`]; tests use a recording backend.
//!
//! Resources are owned values: dropping a buffer, texture or pipeline releases it.
//! There is no explicit destroy call anywhere in the crate.

#[cfg(test)]
pub(crate) mod mock;

use std::ops::Range;

use winit::dpi::PhysicalSize;

use crate::error::InitResult;
use crate::pipeline::{PipelineDescriptor, ShaderLibrary, ShaderSource};
use crate::render::PassDescriptor;
use crate::resources::DecodedImage;

/// Parameters for a device-visible buffer filled at creation.
#[derive(Debug, Copy, Clone)]
pub struct BufferDescriptor<'a> {
    pub label: &'a str,
    pub usage: wgpu::BufferUsages,
    /// Full contents. The buffer holds exactly these bytes; a backend may pad its
    /// allocation to `wgpu::COPY_BUFFER_ALIGNMENT`, and the padding is never read.
    pub contents: &'a [u8],
}

/// Device + queue + presentation surface, as seen by the renderer.
pub trait Backend {
    type Buffer;
    type Texture;
    type ShaderModule;
    type Pipeline;
    /// One acquired presentable image.
    type Frame;
    /// An open command recording scope targeting one frame.
    type Encoder: RenderEncoder<Self>;

    /// Pixel format of the images handed out by [`Backend::acquire_frame`].
    ///
    /// May change between frames; the renderer re-checks it after each acquire.
    fn output_format(&self) -> wgpu::TextureFormat;

    fn create_buffer(&self, desc: &BufferDescriptor<'_>) -> InitResult<Self::Buffer>;

    fn create_texture(&self, image: &DecodedImage) -> InitResult<Self::Texture>;

    /// Loads a shader library and reflects its entry points.
    fn load_shader_library(
        &self,
        source: &ShaderSource,
    ) -> InitResult<ShaderLibrary<Self::ShaderModule>>;

    fn create_pipeline(
        &self,
        desc: &PipelineDescriptor<'_, Self::ShaderModule>,
    ) -> InitResult<Self::Pipeline>;

    /// Surface maintenance after the host's drawable changed size.
    fn resize_surface(&mut self, new_size: PhysicalSize<u32>);

    /// Returns the next presentable image, or `None` if the surface is not ready.
    fn acquire_frame(&mut self) -> Option<Self::Frame>;

    /// Whether the surface failed in a way retrying will not fix.
    ///
    /// Once set, [`Backend::acquire_frame`] keeps returning `None`.
    fn surface_failed(&self) -> bool;

    /// Opens a recording scope with `pass` applied to `frame`'s image.
    ///
    /// `None` means the scope is transiently unavailable.
    fn begin_encoding(&self, frame: &Self::Frame, pass: &PassDescriptor) -> Option<Self::Encoder>;

    /// Closes the recording scope, schedules presentation of `frame` and submits.
    ///
    /// Fire-and-forget: never waits for GPU completion.
    fn commit(&self, encoder: Self::Encoder, frame: Self::Frame);
}

/// Commands recordable inside one render pass.
pub trait RenderEncoder<B: Backend + ?Sized> {
    fn set_pipeline(&mut self, pipeline: &B::Pipeline);

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &B::Buffer);

    fn set_fragment_texture(&mut self, slot: u32, texture: &B::Texture);

    fn draw(&mut self, vertices: Range<u32>);

    fn draw_indexed(&mut self, buffer: &B::Buffer, format: wgpu::IndexFormat, indices: Range<u32>);
}
