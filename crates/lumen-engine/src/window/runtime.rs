use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{DeviceInit, WgpuBackend};
use crate::render::{Renderer, RendererConfig};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and renders `renderer` into it until the window closes.
    ///
    /// Initialization failures and an unrecoverable surface end the loop and are
    /// returned here. A texture without a scale factor takes the window's.
    pub fn run(config: RuntimeConfig, device_init: DeviceInit, renderer: RendererConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState {
            config,
            device_init,
            renderer,
            entry: None,
            error: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// The renderer borrows the window through its surface.
#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[not_covariant]
    renderer: Renderer<WgpuBackend<'this>>,
}

struct AppState {
    config: RuntimeConfig,
    device_init: DeviceInit,
    renderer: RendererConfig,

    entry: Option<WindowEntry>,
    error: Option<anyhow::Error>,
}

impl AppState {
    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let size = window.inner_size();
        let device_init = self.device_init.clone();
        let renderer = self.renderer.clone().with_display_scale(window.scale_factor());

        let entry = WindowEntryTryBuilder {
            window,
            renderer_builder: |w| Renderer::initialize(w, size, device_init, &renderer),
        }
        .try_build()
        .with_context(|| format!("failed to initialize `{}`", renderer.label))?;

        Ok(entry)
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            entry.with_renderer(|r| {
                let stats = r.stats();
                log::info!(
                    "{}: {} frames presented, {} skipped",
                    r.label(),
                    stats.presented,
                    stats.skipped()
                );
            });
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(entry) => {
                entry.with_window(|w| w.request_redraw());
                self.entry = Some(entry);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw at display refresh.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };
        if entry.with_window(|w| w.id()) != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                entry.with_renderer_mut(|r| r.on_surface_resized(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_renderer_mut(|r| r.on_surface_resized(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => {
                let failed = entry.with_mut(|fields| {
                    fields.window.pre_present_notify();
                    fields.renderer.render_frame();
                    fields.renderer.surface_failed()
                });
                if failed {
                    self.error = Some(anyhow::anyhow!("presentation surface failed"));
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }
}
