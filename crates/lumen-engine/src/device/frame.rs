use std::ops::Range;

use crate::backend::RenderEncoder;

use super::{WgpuBackend, WgpuTexture};

/// A single acquired drawable.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

/// Open render pass plus the encoder that owns it.
///
/// The pass is detached from the encoder borrow so both can travel together
/// until [`crate::backend::Backend::commit`].
pub struct WgpuEncoder {
    pub(super) pass: wgpu::RenderPass<'static>,
    pub(super) encoder: wgpu::CommandEncoder,
}

impl<'w> RenderEncoder<WgpuBackend<'w>> for WgpuEncoder {
    fn set_pipeline(&mut self, pipeline: &wgpu::RenderPipeline) {
        self.pass.set_pipeline(pipeline);
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &wgpu::Buffer) {
        self.pass.set_vertex_buffer(slot, buffer.slice(..));
    }

    /// Fragment texture slot N is bind group N (texture at binding 0, sampler at 1).
    fn set_fragment_texture(&mut self, slot: u32, texture: &WgpuTexture) {
        self.pass.set_bind_group(slot, &texture.bind_group, &[]);
    }

    fn draw(&mut self, vertices: Range<u32>) {
        self.pass.draw(vertices, 0..1);
    }

    fn draw_indexed(&mut self, buffer: &wgpu::Buffer, format: wgpu::IndexFormat, indices: Range<u32>) {
        self.pass.set_index_buffer(buffer.slice(..), format);
        self.pass.draw_indexed(indices, 0, 0..1);
    }
}
