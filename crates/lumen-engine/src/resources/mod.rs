//! Uploading static geometry and texture data to the device.

mod texture;
mod upload;

pub use texture::{
    DecodedImage, TextureAsset, TextureOptions, TextureOrigin, decode_texture, load_texture,
};
pub use upload::{upload_indices, upload_vertices};

#[cfg(test)]
pub(crate) use texture::tests::two_row_png;
