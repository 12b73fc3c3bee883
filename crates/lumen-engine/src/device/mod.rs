//! wgpu device context.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the surface (swapchain)
//! - implementing [`crate::backend::Backend`] on top of them

mod context;
mod frame;
mod init;
mod surface;

pub use context::{WgpuBackend, WgpuTexture};
pub use frame::{GpuFrame, WgpuEncoder};
pub use init::DeviceInit;
pub use surface::SurfaceErrorAction;
