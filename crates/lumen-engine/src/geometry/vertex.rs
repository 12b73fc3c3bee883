use bytemuck::{Pod, Zeroable};

/// CPU-side vertex description.
///
/// Positions are in normalized device coordinates. Color is straight RGBA.
/// Texture coordinates use a top-left origin: (0, 0) is the first texel row.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub texture_coordinate: Option<[f32; 2]>,
}

impl Vertex {
    #[inline]
    pub const fn colored(position: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            texture_coordinate: None,
        }
    }

    #[inline]
    pub const fn textured(position: [f32; 2], color: [f32; 4], uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            texture_coordinate: Some(uv),
        }
    }

    #[inline]
    pub fn layout(&self) -> VertexLayout {
        if self.texture_coordinate.is_some() {
            VertexLayout::Textured
        } else {
            VertexLayout::Colored
        }
    }
}

/// Attribute layout shared by every vertex of one geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VertexLayout {
    /// position (location 0) + color (location 1)
    Colored,
    /// position (location 0) + color (location 1) + uv (location 2)
    Textured,
}

impl VertexLayout {
    /// Byte stride of one packed vertex.
    pub fn stride(self) -> u64 {
        match self {
            VertexLayout::Colored => std::mem::size_of::<ColorVertex>() as u64,
            VertexLayout::Textured => std::mem::size_of::<TexturedVertex>() as u64,
        }
    }

    pub fn attributes(self) -> &'static [wgpu::VertexAttribute] {
        match self {
            VertexLayout::Colored => &ColorVertex::ATTRS,
            VertexLayout::Textured => &TexturedVertex::ATTRS,
        }
    }

    /// Vertex buffer layout bound at slot 0.
    pub fn buffer_layout(self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.attributes(),
        }
    }
}

// ── packed GPU vertices ───────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4  // color
    ];
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub texture_coordinate: [f32; 2],
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];
}
