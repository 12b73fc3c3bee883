/// Color attachment configuration for the single render pass of a frame.
///
/// The color target is always the frame's acquired image, so it is not part of
/// the descriptor.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassDescriptor {
    pub label: &'static str,
    pub ops: wgpu::Operations<wgpu::Color>,
}

impl PassDescriptor {
    /// Clear to opaque black, keep the result.
    pub fn clear_to_black() -> Self {
        Self {
            label: "lumen frame pass",
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        }
    }

    /// Clear color if the pass clears on load.
    pub fn clear_color(&self) -> Option<wgpu::Color> {
        match self.ops.load {
            wgpu::LoadOp::Clear(c) => Some(c),
            _ => None,
        }
    }
}
