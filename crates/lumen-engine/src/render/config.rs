use crate::geometry::Geometry;
use crate::pipeline::{FRAGMENT_SHADER, ShaderSource, VERTEX_SHADER};
use crate::resources::{TextureAsset, TextureOptions};

/// Texture bound at fragment slot 0 for the textured variant.
#[derive(Debug, Clone)]
pub struct TextureSource {
    pub asset: TextureAsset,
    /// Display density of the asset (>= 1.0). `None` takes the density of the
    /// display the renderer is hosted on, or 1.0 without one.
    pub scale_factor: Option<f32>,
    pub options: TextureOptions,
}

impl TextureSource {
    pub fn new(asset: TextureAsset, scale_factor: f32) -> Self {
        Self {
            asset,
            scale_factor: Some(scale_factor),
            options: TextureOptions::default(),
        }
    }

    /// An asset authored at the host display's density.
    pub fn at_display_scale(asset: TextureAsset) -> Self {
        Self {
            asset,
            scale_factor: None,
            options: TextureOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TextureOptions) -> Self {
        self.options = options;
        self
    }
}

/// What a [`super::Renderer`] draws: one geometry, optionally textured.
///
/// Triangle, quad and textured quad are the same renderer with different
/// configurations.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub label: String,
    pub geometry: Geometry,
    pub texture: Option<TextureSource>,
    /// Overrides the built-in library picked from `texture`.
    pub shader: Option<ShaderSource>,
    pub vertex_shader: String,
    pub fragment_shader: String,
}

impl RendererConfig {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            label: "lumen renderer".to_string(),
            geometry,
            texture: None,
            shader: None,
            vertex_shader: VERTEX_SHADER.to_string(),
            fragment_shader: FRAGMENT_SHADER.to_string(),
        }
    }

    pub fn triangle() -> Self {
        Self::new(Geometry::triangle()).with_label("lumen triangle")
    }

    pub fn quad() -> Self {
        Self::new(Geometry::quad()).with_label("lumen quad")
    }

    pub fn textured_quad(texture: TextureSource) -> Self {
        Self::new(Geometry::textured_quad())
            .with_label("lumen textured quad")
            .with_texture(texture)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_texture(mut self, texture: TextureSource) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_shader(mut self, shader: ShaderSource) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn with_entry_points(mut self, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    /// Fills an unset texture scale factor from the host display.
    ///
    /// Densities below 1.0 are clamped to 1.0.
    pub fn with_display_scale(mut self, display_scale: f64) -> Self {
        if let Some(texture) = &mut self.texture {
            if texture.scale_factor.is_none() {
                texture.scale_factor = Some((display_scale as f32).max(1.0));
            }
        }
        self
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// The library used to build the pipeline.
    pub fn shader_source(&self) -> ShaderSource {
        match (&self.shader, self.is_textured()) {
            (Some(custom), _) => custom.clone(),
            (None, true) => ShaderSource::textured(),
            (None, false) => ShaderSource::colored(),
        }
    }
}
