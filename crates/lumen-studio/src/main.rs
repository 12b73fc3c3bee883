use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use lumen_engine::device::DeviceInit;
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::render::{RendererConfig, TextureSource};
use lumen_engine::resources::{TextureAsset, TextureOptions, TextureOrigin};
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Which built-in scene to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
enum Variant {
    /// Three vertices, red/green/blue, no index buffer.
    #[default]
    Triangle,
    /// Indexed vertex-colored quad.
    Quad,
    /// Indexed quad sampling a texture.
    Textured,
}

/// Opens a window and renders one of the built-in scenes.
#[derive(Debug, Parser)]
#[command(name = "lumen-studio", version)]
struct Args {
    #[arg(long, value_enum, default_value_t = Variant::default())]
    variant: Variant,

    /// Image for the textured variant; a generated checkerboard otherwise.
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Display density of the texture asset; the window's when omitted.
    #[arg(long)]
    scale_factor: Option<f32>,

    /// Treat encoded row 0 as the bottom of the texture.
    #[arg(long)]
    bottom_left: bool,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Present without waiting for vblank, when supported.
    #[arg(long)]
    no_vsync: bool,

    /// `env_logger` filter, overrides RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn renderer_config(&self) -> Result<RendererConfig> {
        Ok(match self.variant {
            Variant::Triangle => RendererConfig::triangle(),
            Variant::Quad => RendererConfig::quad(),
            Variant::Textured => RendererConfig::textured_quad(self.texture_source()?),
        })
    }

    fn texture_source(&self) -> Result<TextureSource> {
        let asset = match &self.texture {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read texture {}", path.display()))?;
                TextureAsset::new(path.display().to_string(), bytes)
            }
            None => TextureAsset::new("checkerboard", checkerboard_png(64, 8)?),
        };

        let origin = if self.bottom_left {
            TextureOrigin::BottomLeft
        } else {
            TextureOrigin::TopLeft
        };

        let source = match self.scale_factor {
            Some(scale) => TextureSource::new(asset, scale),
            None => TextureSource::at_display_scale(asset),
        };
        Ok(source.with_options(TextureOptions { origin }))
    }

    fn device_init(&self) -> DeviceInit {
        DeviceInit {
            present_mode: if self.no_vsync {
                wgpu::PresentMode::AutoNoVsync
            } else {
                wgpu::PresentMode::Fifo
            },
            ..Default::default()
        }
    }
}

/// Encodes a `size`x`size` PNG of alternating white and orange cells.
fn checkerboard_png(size: u32, cells: u32) -> Result<Vec<u8>> {
    let cell = (size / cells.max(1)).max(1);
    let img = image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([255, 140, 0, 255])
        }
    });

    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .context("failed to encode checkerboard")?;
    Ok(out.into_inner())
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..Default::default()
    });

    let renderer = args.renderer_config()?;
    let runtime = RuntimeConfig {
        title: format!("lumen studio - {}", renderer.label),
        initial_size: LogicalSize::new(args.width as f64, args.height as f64),
    };

    log::info!("starting {:?}", args.variant);
    Runtime::run(runtime, args.device_init(), renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lumen-studio").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_triangle() {
        let args = parse(&[]);
        assert_eq!(args.variant, Variant::Triangle);
        let config = args.renderer_config().unwrap();
        assert!(!config.is_textured());
        assert_eq!(config.geometry.vertex_count(), 3);
    }

    #[test]
    fn textured_without_path_uses_checkerboard() {
        let args = parse(&["--variant", "textured", "--scale-factor", "2"]);
        let config = args.renderer_config().unwrap();
        let texture = config.texture.unwrap();
        assert_eq!(texture.asset.name, "checkerboard");
        assert_eq!(texture.scale_factor, Some(2.0));
        assert_eq!(texture.options.origin, TextureOrigin::TopLeft);
    }

    #[test]
    fn omitted_scale_factor_follows_the_window() {
        let args = parse(&["--variant", "textured"]);
        let texture = args.texture_source().unwrap();
        assert_eq!(texture.scale_factor, None);

        let config = args.renderer_config().unwrap().with_display_scale(2.0);
        assert_eq!(config.texture.unwrap().scale_factor, Some(2.0));
    }

    #[test]
    fn bottom_left_flag_sets_origin() {
        let args = parse(&["--variant", "textured", "--bottom-left"]);
        let texture = args.texture_source().unwrap();
        assert_eq!(texture.options.origin, TextureOrigin::BottomLeft);
    }

    #[test]
    fn missing_texture_file_is_reported() {
        let args = parse(&["--variant", "textured", "--texture", "/nonexistent/lumen.png"]);
        let err = args.renderer_config().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read texture"));
    }

    #[test]
    fn checkerboard_decodes() {
        let png = checkerboard_png(16, 4).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (16, 16));
        assert_ne!(img.get_pixel(0, 0), img.get_pixel(4, 0));
    }

    #[test]
    fn unknown_variant_rejected() {
        let argv = ["lumen-studio", "--variant", "cube"];
        assert!(Args::try_parse_from(argv).is_err());
    }
}
