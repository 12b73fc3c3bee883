use super::{Geometry, Vertex};

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// Two triangles sharing the 0-2 diagonal.
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

impl Geometry {
    /// One colored triangle, drawn without an index buffer.
    pub fn triangle() -> Self {
        Self {
            layout: super::VertexLayout::Colored,
            vertices: vec![
                Vertex::colored([0.0, 0.75], RED),
                Vertex::colored([-0.75, -0.75], GREEN),
                Vertex::colored([0.75, -0.75], BLUE),
            ],
            indices: None,
        }
    }

    /// Colored quad spanning ±0.75 in NDC, drawn with 6 indices.
    pub fn quad() -> Self {
        Self {
            layout: super::VertexLayout::Colored,
            vertices: vec![
                Vertex::colored([-0.75, -0.75], RED),
                Vertex::colored([0.75, -0.75], GREEN),
                Vertex::colored([0.75, 0.75], BLUE),
                Vertex::colored([-0.75, 0.75], GREEN),
            ],
            indices: Some(QUAD_INDICES.to_vec()),
        }
    }

    /// Same quad with texture coordinates.
    ///
    /// UV (0, 0) is the top-left of the image, so the NDC top edge (+Y) maps to v = 0.
    pub fn textured_quad() -> Self {
        Self {
            layout: super::VertexLayout::Textured,
            vertices: vec![
                Vertex::textured([-0.75, -0.75], RED, [0.0, 1.0]),
                Vertex::textured([0.75, -0.75], GREEN, [1.0, 1.0]),
                Vertex::textured([0.75, 0.75], BLUE, [1.0, 0.0]),
                Vertex::textured([-0.75, 0.75], GREEN, [0.0, 0.0]),
            ],
            indices: Some(QUAD_INDICES.to_vec()),
        }
    }
}
