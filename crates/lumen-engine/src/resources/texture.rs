use std::borrow::Cow;

use image::GenericImageView;

use crate::backend::Backend;
use crate::error::{InitResult, InitializationError};

/// Named, encoded image handed over by the host's asset loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    pub name: String,
    pub bytes: Cow<'static, [u8]>,
}

impl TextureAsset {
    pub fn new(name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Where row 0 of the encoded image ends up.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum TextureOrigin {
    /// Encoded row 0 is texel row 0 (v = 0).
    #[default]
    TopLeft,
    /// Rows are flipped on decode.
    BottomLeft,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TextureOptions {
    pub origin: TextureOrigin,
}

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// Tightly packed rows, top row first.
    pub pixels: Vec<u8>,
    /// Display-density metadata; never used to resample.
    pub scale_factor: f32,
}

impl DecodedImage {
    pub fn bytes_per_row(&self) -> u32 {
        4 * self.width
    }
}

/// Decodes `asset` into RGBA8 pixels.
pub fn decode_texture(
    asset: &TextureAsset,
    scale_factor: f32,
    options: TextureOptions,
) -> InitResult<DecodedImage> {
    let failed = |reason: String| InitializationError::TextureDecodeFailed {
        name: asset.name.clone(),
        reason,
    };

    if !scale_factor.is_finite() || scale_factor < 1.0 {
        return Err(failed(format!("scale factor {scale_factor} must be a finite value >= 1.0")));
    }

    let mut img = image::load_from_memory(&asset.bytes).map_err(|e| failed(e.to_string()))?;

    if options.origin == TextureOrigin::BottomLeft {
        img = img.flipv();
    }

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(failed("image has zero size".to_string()));
    }

    Ok(DecodedImage {
        name: asset.name.clone(),
        width,
        height,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        pixels: img.to_rgba8().into_raw(),
        scale_factor,
    })
}

/// Decodes `asset` and uploads it as a sampled 2D texture.
pub fn load_texture<B: Backend>(
    backend: &B,
    asset: &TextureAsset,
    scale_factor: f32,
    options: TextureOptions,
) -> InitResult<B::Texture> {
    let decoded = decode_texture(asset, scale_factor, options)?;
    let texture = backend.create_texture(&decoded)?;
    log::debug!(
        "loaded texture `{}` ({}x{} @{}x)",
        decoded.name,
        decoded.width,
        decoded.height,
        decoded.scale_factor
    );
    Ok(texture)
}
