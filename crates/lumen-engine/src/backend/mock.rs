//! Recording backend for tests.
//!
//! Every resource carries a live token so tests can observe leaks, and every
//! committed frame is recorded with its pass and command list.

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::rc::Rc;

use winit::dpi::PhysicalSize;

use super::{Backend, BufferDescriptor, RenderEncoder};
use crate::error::{InitResult, InitializationError};
use crate::pipeline::{
    PipelineDescriptor, ShaderLibrary, ShaderSource, reflect_wgsl, shader_capabilities,
};
use crate::render::PassDescriptor;
use crate::resources::DecodedImage;

/// Failure injection and surface format for a [`MockBackend`].
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub no_device: bool,
    pub no_queue: bool,
    /// Zero-based buffer creation call that fails.
    pub fail_buffer: Option<usize>,
    pub fail_texture: bool,
    pub fail_pipeline: bool,
    pub output_format: wgpu::TextureFormat,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            no_device: false,
            no_queue: false,
            fail_buffer: None,
            fail_texture: false,
            fail_pipeline: false,
            output_format: wgpu::TextureFormat::Bgra8UnormSrgb,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPipeline { label: String },
    SetVertexBuffer { slot: u32, size: u64 },
    SetFragmentTexture { slot: u32, name: String },
    Draw { vertices: Range<u32> },
    DrawIndexed {
        format: wgpu::IndexFormat,
        indices: Range<u32>,
        buffer_size: u64,
    },
}

#[derive(Debug, Clone)]
pub struct Submission {
    pub frame: u64,
    pub pass: PassDescriptor,
    pub commands: Vec<Command>,
}

impl Submission {
    pub fn draw_calls(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Draw { .. } | Command::DrawIndexed { .. }))
            .count()
    }
}

#[derive(Debug, Default)]
struct RecorderState {
    live_devices: Cell<usize>,
    live_buffers: Cell<usize>,
    live_textures: Cell<usize>,
    live_pipelines: Cell<usize>,
    drawable_missing: Cell<bool>,
    encoder_missing: Cell<bool>,
    surface_failed: Cell<bool>,
    acquired: Cell<u64>,
    output_format: Cell<Option<wgpu::TextureFormat>>,
    resizes: RefCell<Vec<PhysicalSize<u32>>>,
    submissions: RefCell<Vec<Submission>>,
}

/// Shared view into a mock backend, kept by the test after the backend moves.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RecorderState>);

impl Recorder {
    pub fn live_devices(&self) -> usize {
        self.0.live_devices.get()
    }

    pub fn live_buffers(&self) -> usize {
        self.0.live_buffers.get()
    }

    pub fn live_textures(&self) -> usize {
        self.0.live_textures.get()
    }

    pub fn live_pipelines(&self) -> usize {
        self.0.live_pipelines.get()
    }

    pub fn live_resources(&self) -> usize {
        self.live_devices() + self.live_buffers() + self.live_textures() + self.live_pipelines()
    }

    pub fn set_drawable_available(&self, available: bool) {
        self.0.drawable_missing.set(!available);
    }

    pub fn set_encoder_available(&self, available: bool) {
        self.0.encoder_missing.set(!available);
    }

    /// Puts the surface in the unrecoverable state; acquires fail from now on.
    pub fn fail_surface(&self) {
        self.0.surface_failed.set(true);
    }

    /// Switches the surface format reported by the backend.
    pub fn set_output_format(&self, format: wgpu::TextureFormat) {
        self.0.output_format.set(Some(format));
    }

    pub fn resizes(&self) -> Vec<PhysicalSize<u32>> {
        self.0.resizes.borrow().clone()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.0.submissions.borrow().clone()
    }

    pub fn total_draw_calls(&self) -> usize {
        self.0.submissions.borrow().iter().map(Submission::draw_calls).sum()
    }
}

/// Decrements its counter on drop.
pub struct Live {
    recorder: Recorder,
    counter: fn(&RecorderState) -> &Cell<usize>,
}

impl Live {
    fn new(recorder: &Recorder, counter: fn(&RecorderState) -> &Cell<usize>) -> Self {
        let c = counter(&recorder.0);
        c.set(c.get() + 1);
        Self {
            recorder: recorder.clone(),
            counter,
        }
    }
}

impl std::fmt::Debug for Live {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Live")
    }
}

impl Drop for Live {
    fn drop(&mut self) {
        let c = (self.counter)(&self.recorder.0);
        c.set(c.get() - 1);
    }
}

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub usage: wgpu::BufferUsages,
    _live: Live,
}

#[derive(Debug)]
pub struct MockTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    _live: Live,
}

#[derive(Debug)]
pub struct MockPipeline {
    pub label: String,
    pub output_format: wgpu::TextureFormat,
    pub textured: bool,
    _live: Live,
}

pub struct MockFrame {
    id: u64,
}

pub struct MockEncoder {
    pass: PassDescriptor,
    commands: Vec<Command>,
}

pub struct MockBackend {
    config: MockConfig,
    recorder: Recorder,
    buffers_created: Cell<usize>,
    _live: Live,
}

impl MockBackend {
    pub fn new(config: MockConfig) -> InitResult<Self> {
        Self::with_recorder(config, Recorder::default())
    }

    /// Like [`MockBackend::new`] but reports into an existing recorder.
    pub fn with_recorder(config: MockConfig, recorder: Recorder) -> InitResult<Self> {
        if config.no_device {
            return Err(InitializationError::DeviceUnavailable("mock: no adapter".into()));
        }
        if config.no_queue {
            return Err(InitializationError::QueueCreationFailed("mock: no queue".into()));
        }
        Ok(Self {
            _live: Live::new(&recorder, |s| &s.live_devices),
            config,
            recorder,
            buffers_created: Cell::new(0),
        })
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }
}

impl Backend for MockBackend {
    type Buffer = MockBuffer;
    type Texture = MockTexture;
    type ShaderModule = ();
    type Pipeline = MockPipeline;
    type Frame = MockFrame;
    type Encoder = MockEncoder;

    fn output_format(&self) -> wgpu::TextureFormat {
        self.recorder.0.output_format.get().unwrap_or(self.config.output_format)
    }

    fn create_buffer(&self, desc: &BufferDescriptor<'_>) -> InitResult<MockBuffer> {
        let n = self.buffers_created.get();
        self.buffers_created.set(n + 1);

        if self.config.fail_buffer == Some(n) {
            return Err(InitializationError::BufferAllocationFailed {
                label: desc.label.to_string(),
                size: desc.contents.len() as u64,
                reason: "mock: injected failure".into(),
            });
        }

        Ok(MockBuffer {
            size: desc.contents.len() as u64,
            usage: desc.usage,
            _live: Live::new(&self.recorder, |s| &s.live_buffers),
        })
    }

    fn create_texture(&self, image: &DecodedImage) -> InitResult<MockTexture> {
        if self.config.fail_texture {
            return Err(InitializationError::TextureDecodeFailed {
                name: image.name.clone(),
                reason: "mock: injected failure".into(),
            });
        }
        Ok(MockTexture {
            name: image.name.clone(),
            width: image.width,
            height: image.height,
            _live: Live::new(&self.recorder, |s| &s.live_textures),
        })
    }

    fn load_shader_library(&self, source: &ShaderSource) -> InitResult<ShaderLibrary<()>> {
        let functions = reflect_wgsl(source, shader_capabilities(wgpu::Features::empty()))?;
        Ok(ShaderLibrary::new(source.label.clone(), (), functions))
    }

    fn create_pipeline(&self, desc: &PipelineDescriptor<'_, ()>) -> InitResult<MockPipeline> {
        if self.config.fail_pipeline {
            return Err(InitializationError::PipelineLinkFailed {
                label: desc.label.to_string(),
                reason: "mock: injected failure".into(),
            });
        }
        Ok(MockPipeline {
            label: desc.label.to_string(),
            output_format: desc.output_format,
            textured: desc.textured,
            _live: Live::new(&self.recorder, |s| &s.live_pipelines),
        })
    }

    fn resize_surface(&mut self, new_size: PhysicalSize<u32>) {
        self.recorder.0.resizes.borrow_mut().push(new_size);
    }

    fn acquire_frame(&mut self) -> Option<MockFrame> {
        if self.recorder.0.drawable_missing.get() || self.recorder.0.surface_failed.get() {
            return None;
        }
        let id = self.recorder.0.acquired.get();
        self.recorder.0.acquired.set(id + 1);
        Some(MockFrame { id })
    }

    fn surface_failed(&self) -> bool {
        self.recorder.0.surface_failed.get()
    }

    fn begin_encoding(&self, _frame: &MockFrame, pass: &PassDescriptor) -> Option<MockEncoder> {
        if self.recorder.0.encoder_missing.get() {
            return None;
        }
        Some(MockEncoder {
            pass: *pass,
            commands: Vec::new(),
        })
    }

    fn commit(&self, encoder: MockEncoder, frame: MockFrame) {
        self.recorder.0.submissions.borrow_mut().push(Submission {
            frame: frame.id,
            pass: encoder.pass,
            commands: encoder.commands,
        });
    }
}

impl RenderEncoder<MockBackend> for MockEncoder {
    fn set_pipeline(&mut self, pipeline: &MockPipeline) {
        self.commands.push(Command::SetPipeline {
            label: pipeline.label.clone(),
        });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: &MockBuffer) {
        self.commands.push(Command::SetVertexBuffer {
            slot,
            size: buffer.size,
        });
    }

    fn set_fragment_texture(&mut self, slot: u32, texture: &MockTexture) {
        self.commands.push(Command::SetFragmentTexture {
            slot,
            name: texture.name.clone(),
        });
    }

    fn draw(&mut self, vertices: Range<u32>) {
        self.commands.push(Command::Draw { vertices });
    }

    fn draw_indexed(&mut self, buffer: &MockBuffer, format: wgpu::IndexFormat, indices: Range<u32>) {
        self.commands.push(Command::DrawIndexed {
            format,
            indices,
            buffer_size: buffer.size,
        });
    }
}
