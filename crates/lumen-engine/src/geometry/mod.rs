//! Static geometry definitions.
//!
//! A [`Geometry`] is validated once at construction and never mutated afterwards,
//! so everything downstream (upload, draw) can rely on its invariants.

mod shapes;
mod vertex;

pub use vertex::{ColorVertex, TexturedVertex, Vertex, VertexLayout};

use crate::error::GeometryError;

/// Immutable vertex list plus optional triangle-list indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    layout: VertexLayout,
    vertices: Vec<Vertex>,
    indices: Option<Vec<u16>>,
}

impl Geometry {
    /// Validates and builds a geometry.
    ///
    /// Indices (when present) must describe whole triangles and reference existing
    /// vertices, and indexed geometry is limited to what a 16-bit index can reach.
    /// Without indices the vertex list itself must be whole triangles.
    pub fn new(vertices: Vec<Vertex>, indices: Option<Vec<u16>>) -> Result<Self, GeometryError> {
        let first = vertices.first().ok_or(GeometryError::Empty)?;
        let layout = first.layout();

        for (index, v) in vertices.iter().enumerate() {
            if v.layout() != layout {
                return Err(GeometryError::MixedLayout { index });
            }
            if let Some([u, t]) = v.texture_coordinate {
                if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&t) {
                    return Err(GeometryError::TextureCoordinateOutOfRange { index });
                }
            }
        }

        match &indices {
            Some(idx) => {
                if vertices.len() > usize::from(u16::MAX) + 1 {
                    return Err(GeometryError::TooManyVertices {
                        count: vertices.len(),
                    });
                }
                if idx.is_empty() || idx.len() % 3 != 0 {
                    return Err(GeometryError::IndexCountNotTriangles { count: idx.len() });
                }
                if let Some((position, &value)) = idx
                    .iter()
                    .enumerate()
                    .find(|(_, i)| usize::from(**i) >= vertices.len())
                {
                    return Err(GeometryError::IndexOutOfRange {
                        position,
                        value,
                        vertex_count: vertices.len(),
                    });
                }
            }
            None => {
                if vertices.len() % 3 != 0 {
                    return Err(GeometryError::VertexCountNotTriangles {
                        count: vertices.len(),
                    });
                }
            }
        }

        Ok(Self {
            layout,
            vertices,
            indices,
        })
    }

    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|i| i.len() as u32)
    }

    /// Number of triangles the draw call produces.
    pub fn triangle_count(&self) -> u32 {
        self.index_count().unwrap_or(self.vertex_count()) / 3
    }

    /// Packs vertices into the byte layout matching [`Geometry::layout`].
    ///
    /// The result is exactly `vertex_count * layout.stride()` bytes.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        match self.layout {
            VertexLayout::Colored => {
                let packed: Vec<ColorVertex> = self
                    .vertices
                    .iter()
                    .map(|v| ColorVertex {
                        position: v.position,
                        color: v.color,
                    })
                    .collect();
                bytemuck::cast_slice(&packed).to_vec()
            }
            VertexLayout::Textured => {
                let packed: Vec<TexturedVertex> = self
                    .vertices
                    .iter()
                    .map(|v| TexturedVertex {
                        position: v.position,
                        color: v.color,
                        texture_coordinate: v.texture_coordinate.unwrap_or_default(),
                    })
                    .collect();
                bytemuck::cast_slice(&packed).to_vec()
            }
        }
    }
}
