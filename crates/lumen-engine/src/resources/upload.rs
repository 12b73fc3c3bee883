//! Static buffer uploads.
//!
//! Buffer contents are exactly `count * stride` bytes. The wgpu backend pads the
//! allocation up to `wgpu::COPY_BUFFER_ALIGNMENT`, so a 3-index buffer occupies 8
//! bytes of which 6 are drawn; draw ranges always come from the counts.

use crate::backend::{Backend, BufferDescriptor};
use crate::error::{InitResult, InitializationError};
use crate::geometry::Geometry;

/// Copies every vertex of `geometry` into a vertex buffer.
pub fn upload_vertices<B: Backend>(backend: &B, geometry: &Geometry) -> InitResult<B::Buffer> {
    let bytes = geometry.vertex_bytes();
    let stride = geometry.layout().stride();
    debug_assert_eq!(bytes.len() as u64, u64::from(geometry.vertex_count()) * stride);

    upload(
        backend,
        &BufferDescriptor {
            label: "lumen vertex buffer",
            usage: wgpu::BufferUsages::VERTEX,
            contents: &bytes,
        },
    )
}

/// Copies `indices` into a 16-bit index buffer.
pub fn upload_indices<B: Backend>(backend: &B, indices: &[u16]) -> InitResult<B::Buffer> {
    upload(
        backend,
        &BufferDescriptor {
            label: "lumen index buffer",
            usage: wgpu::BufferUsages::INDEX,
            contents: bytemuck::cast_slice(indices),
        },
    )
}

fn upload<B: Backend>(backend: &B, desc: &BufferDescriptor<'_>) -> InitResult<B::Buffer> {
    if desc.contents.is_empty() {
        return Err(InitializationError::BufferAllocationFailed {
            label: desc.label.to_string(),
            size: 0,
            reason: "zero-sized buffer".to_string(),
        });
    }

    let buffer = backend.create_buffer(desc)?;
    log::debug!("uploaded {} ({} bytes)", desc.label, desc.contents.len());
    Ok(buffer)
}
