//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and a single window, and drives a [`crate::render::Renderer`]
//! bound to it.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
