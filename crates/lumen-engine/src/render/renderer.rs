use winit::dpi::PhysicalSize;

use crate::backend::{Backend, RenderEncoder};
use crate::device::{DeviceInit, WgpuBackend};
use crate::error::InitResult;
use crate::geometry::VertexLayout;
use crate::pipeline::{PipelineBuilder, ShaderLibrary};
use crate::resources::{load_texture, upload_indices, upload_vertices};

use super::{FrameStats, PassDescriptor, RendererConfig};

enum DrawCall<Buf> {
    /// Triangle list over a 16-bit index buffer.
    Indexed { buffer: Buf, index_count: u32 },
    /// Triangle list straight from the vertex buffer.
    Vertices { vertex_count: u32 },
}

/// Frame renderer: pipeline + static resources + the per-frame draw loop.
///
/// Lifecycle:
/// - construction is all-or-nothing; a renderer only exists once every resource
///   has been created
/// - `render_frame` records and submits one frame, or skips it silently
/// - dropping the renderer releases everything it owns
pub struct Renderer<B: Backend> {
    label: String,

    pipeline: Option<B::Pipeline>,
    pipeline_format: wgpu::TextureFormat,
    library: ShaderLibrary<B::ShaderModule>,
    vertex_shader: String,
    fragment_shader: String,
    vertex_layout: VertexLayout,
    textured: bool,

    vertex_buffer: B::Buffer,
    draw: DrawCall<B::Buffer>,
    texture: Option<B::Texture>,

    stats: FrameStats,

    // Declared last so GPU resources above are released first.
    backend: B,
}

impl<'w> Renderer<WgpuBackend<'w>> {
    /// Creates the device context for `target` and builds a renderer on top of it.
    pub fn initialize(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: PhysicalSize<u32>,
        init: DeviceInit,
        config: &RendererConfig,
    ) -> InitResult<Self> {
        let backend = pollster::block_on(WgpuBackend::new(target, size, init))?;
        Self::new(backend, config)
    }
}

impl<B: Backend> Renderer<B> {
    /// Builds pipeline, buffers and texture on `backend`.
    ///
    /// On error the backend and every resource created so far are dropped.
    pub fn new(backend: B, config: &RendererConfig) -> InitResult<Self> {
        let geometry = &config.geometry;
        let vertex_layout = geometry.layout();
        let textured = config.is_textured();
        let output_format = backend.output_format();

        let library = backend.load_shader_library(&config.shader_source())?;

        let pipeline = PipelineBuilder::new(&config.label)
            .entry_points(&config.vertex_shader, &config.fragment_shader)
            .vertex_layout(vertex_layout)
            .textured(textured)
            .build(&backend, &library, output_format)?;

        let vertex_buffer = upload_vertices(&backend, geometry)?;

        let draw = match geometry.indices() {
            Some(indices) => DrawCall::Indexed {
                buffer: upload_indices(&backend, indices)?,
                index_count: indices.len() as u32,
            },
            None => DrawCall::Vertices {
                vertex_count: geometry.vertex_count(),
            },
        };

        let texture = config
            .texture
            .as_ref()
            .map(|t| load_texture(&backend, &t.asset, t.scale_factor.unwrap_or(1.0), t.options))
            .transpose()?;

        log::info!(
            "{} ready: {} vertices, {} triangles, {}, {:?}",
            config.label,
            geometry.vertex_count(),
            geometry.triangle_count(),
            if textured { "textured" } else { "untextured" },
            output_format
        );

        Ok(Self {
            label: config.label.clone(),
            pipeline: Some(pipeline),
            pipeline_format: output_format,
            library,
            vertex_shader: config.vertex_shader.clone(),
            fragment_shader: config.fragment_shader.clone(),
            vertex_layout,
            textured,
            vertex_buffer,
            draw,
            texture,
            stats: FrameStats::default(),
            backend,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    /// The surface can no longer present; the host should stop rendering.
    pub fn surface_failed(&self) -> bool {
        self.stats.surface_failed
    }

    /// Surface size change notification.
    ///
    /// Pipeline and buffers live in normalized device coordinates, so renderer
    /// state is untouched; only the backend's surface is maintained.
    pub fn on_surface_resized(&mut self, new_size: PhysicalSize<u32>) {
        log::trace!("{}: surface resized to {}x{}", self.label, new_size.width, new_size.height);
        self.backend.resize_surface(new_size);
    }

    /// Records, submits and presents one frame.
    ///
    /// Returns without side effects when no drawable or recording scope is
    /// available. Never waits for GPU completion.
    pub fn render_frame(&mut self) {
        let Some(frame) = self.backend.acquire_frame() else {
            self.stats.skipped_no_drawable += 1;
            if self.backend.surface_failed() && !self.stats.surface_failed {
                log::error!("{}: surface failed, no further frames can present", self.label);
                self.stats.surface_failed = true;
            }
            log::trace!("{}: no drawable, frame skipped", self.label);
            return;
        };

        self.sync_output_format();

        let pass = PassDescriptor::clear_to_black();

        let Some(mut encoder) = self.backend.begin_encoding(&frame, &pass) else {
            self.stats.skipped_no_encoder += 1;
            log::trace!("{}: no command encoder, frame skipped", self.label);
            return;
        };

        if let Some(pipeline) = &self.pipeline {
            encoder.set_pipeline(pipeline);
            encoder.set_vertex_buffer(0, &self.vertex_buffer);

            if let Some(texture) = &self.texture {
                encoder.set_fragment_texture(0, texture);
            }

            match &self.draw {
                DrawCall::Indexed { buffer, index_count } => {
                    encoder.draw_indexed(buffer, wgpu::IndexFormat::Uint16, 0..*index_count)
                }
                DrawCall::Vertices { vertex_count } => encoder.draw(0..*vertex_count),
            }
        }

        self.backend.commit(encoder, frame);
        self.stats.presented += 1;
    }

    /// Rebuilds the pipeline when the backend's output format moved.
    ///
    /// A failed rebuild leaves no pipeline bound; frames then only clear. The
    /// wgpu backend fixes its format at configuration, so only the recording
    /// backend drives this path.
    fn sync_output_format(&mut self) {
        let format = self.backend.output_format();
        if format == self.pipeline_format {
            return;
        }

        self.pipeline = None;
        self.pipeline_format = format;

        let rebuilt = PipelineBuilder::new(&self.label)
            .entry_points(&self.vertex_shader, &self.fragment_shader)
            .vertex_layout(self.vertex_layout)
            .textured(self.textured)
            .build(&self.backend, &self.library, format);

        match rebuilt {
            Ok(p) => {
                log::info!("{}: pipeline rebuilt for {:?}", self.label, format);
                self.pipeline = Some(p);
            }
            Err(e) => log::error!("{}: pipeline rebuild failed: {e}", self.label),
        }
    }
}
