use std::iter;

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::backend::{Backend, BufferDescriptor};
use crate::error::{InitResult, InitializationError};
use crate::pipeline::{
    PipelineDescriptor, ShaderLibrary, ShaderSource, reflect_wgsl, shader_capabilities,
};
use crate::render::PassDescriptor;
use crate::resources::DecodedImage;

use super::surface::{self, SurfaceErrorAction};
use super::{DeviceInit, GpuFrame, WgpuEncoder};

/// Sampled texture plus the bind group that exposes it at group N.
pub struct WgpuTexture {
    pub name: String,
    pub texture: wgpu::Texture,
    pub(super) bind_group: wgpu::BindGroup,
}

/// Device context: device, queue and the configured presentation surface.
///
/// - creates Instance/Adapter/Device/Queue
/// - creates and configures the surface (swapchain)
/// - owns the texture/sampler layout shared by every textured pipeline
pub struct WgpuBackend<'w> {
    /// Surface bound to the host drawable; `'w` ties it to the window.
    surface: wgpu::Surface<'w>,

    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    /// Set by an unrecoverable acquire error.
    surface_failed: bool,
}

impl<'w> WgpuBackend<'w> {
    /// Acquires a device and queue compatible with `target`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        size: PhysicalSize<u32>,
        init: DeviceInit,
    ) -> InitResult<Self> {
        let DeviceInit {
            prefer_srgb,
            output_format,
            present_mode,
            alpha_mode,
            power_preference,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| InitializationError::DeviceUnavailable(format!("surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| InitializationError::DeviceUnavailable(e.to_string()))?;

        let adapter_info = adapter.get_info();
        log::info!("adapter: {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| InitializationError::QueueCreationFailed(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, output_format, prefer_srgb).ok_or_else(
            || match output_format {
                Some(f) => InitializationError::DeviceUnavailable(format!("surface does not support {f:?}")),
                None => InitializationError::DeviceUnavailable("surface reports no supported formats".into()),
            },
        )?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface::choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        if surface::is_drawable(size) {
            surface.configure(&device, &config);
        }

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        log::debug!(
            "device ready: {:?} {}x{} {:?}",
            format,
            config.width,
            config.height,
            present_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            adapter_info,
            config,
            size,
            texture_layout,
            sampler,
            surface_failed: false,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }
}

impl<'w> Backend for WgpuBackend<'w> {
    type Buffer = wgpu::Buffer;
    type Texture = WgpuTexture;
    type ShaderModule = wgpu::ShaderModule;
    type Pipeline = wgpu::RenderPipeline;
    type Frame = GpuFrame;
    type Encoder = WgpuEncoder;

    fn output_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn create_buffer(&self, desc: &BufferDescriptor<'_>) -> InitResult<wgpu::Buffer> {
        let size = desc.contents.len() as u64;
        let max = self.device.limits().max_buffer_size;

        if size == 0 || size > max {
            return Err(InitializationError::BufferAllocationFailed {
                label: desc.label.to_string(),
                size,
                reason: format!("size must be within 1..={max} bytes"),
            });
        }

        // The allocation is padded to COPY_BUFFER_ALIGNMENT; draws only read
        // `contents`.
        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(desc.label),
            contents: desc.contents,
            usage: desc.usage,
        }))
    }

    fn create_texture(&self, image: &DecodedImage) -> InitResult<WgpuTexture> {
        let max = self.device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(InitializationError::TextureDecodeFailed {
                name: image.name.clone(),
                reason: format!(
                    "{}x{} exceeds the device limit of {max}",
                    image.width, image.height
                ),
            });
        }

        let extent = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(image.name.as_str()),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: image.format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen texture bind group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Ok(WgpuTexture {
            name: image.name.clone(),
            texture,
            bind_group,
        })
    }

    fn load_shader_library(
        &self,
        source: &ShaderSource,
    ) -> InitResult<ShaderLibrary<wgpu::ShaderModule>> {
        // Validated against the enabled features, so the module below never
        // reports errors.
        let functions = reflect_wgsl(source, shader_capabilities(self.device.features()))?;

        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label.as_ref()),
            source: wgpu::ShaderSource::Wgsl(source.wgsl.clone()),
        });

        Ok(ShaderLibrary::new(source.label.clone(), module, functions))
    }

    fn create_pipeline(
        &self,
        desc: &PipelineDescriptor<'_, wgpu::ShaderModule>,
    ) -> InitResult<wgpu::RenderPipeline> {
        let module = desc.library.module();

        let texture_layouts = [&self.texture_layout];
        let bind_group_layouts: &[&wgpu::BindGroupLayout] = if desc.textured {
            &texture_layouts
        } else {
            &[]
        };

        let layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(desc.label),
            bind_group_layouts,
            immediate_size: 0,
        });

        Ok(self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module,
                entry_point: Some(desc.vertex.name.as_str()),
                compilation_options: Default::default(),
                buffers: &[desc.vertex_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some(desc.fragment.name.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.output_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }))
    }

    fn resize_surface(&mut self, new_size: PhysicalSize<u32>) {
        surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );
    }

    fn acquire_frame(&mut self) -> Option<GpuFrame> {
        if self.surface_failed || !surface::is_drawable(self.size) {
            return None;
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                let action = surface::map_surface_error(
                    &self.surface,
                    &self.device,
                    &self.config,
                    self.size,
                    err.clone(),
                );
                match action {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface error: {err}");
                        self.surface_failed = true;
                    }
                    _ => log::trace!("surface error: {err} ({action:?})"),
                }
                return None;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Some(GpuFrame {
            surface_texture,
            view,
        })
    }

    fn surface_failed(&self) -> bool {
        self.surface_failed
    }

    fn begin_encoding(&self, frame: &GpuFrame, desc: &PassDescriptor) -> Option<WgpuEncoder> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lumen frame encoder"),
            });

        let pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(desc.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: desc.ops,
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        Some(WgpuEncoder { pass, encoder })
    }

    fn commit(&self, encoder: WgpuEncoder, frame: GpuFrame) {
        let WgpuEncoder { pass, encoder } = encoder;
        drop(pass);

        self.queue.submit(iter::once(encoder.finish()));

        let GpuFrame {
            surface_texture,
            view,
        } = frame;
        drop(view);
        surface_texture.present();
    }
}
