//! Lumen engine crate.
//!
//! A minimal GPU rendering core: device context, pipeline builder, resource
//! uploader and a frame renderer, plus the window runtime that hosts them.
//!
//! ```no_run
//! use lumen_engine::device::DeviceInit;
//! use lumen_engine::render::RendererConfig;
//! use lumen_engine::window::{Runtime, RuntimeConfig};
//!
//! Runtime::run(RuntimeConfig::default(), DeviceInit::default(), RendererConfig::triangle())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod resources;
pub mod window;

pub use error::{GeometryError, InitResult, InitializationError};
