use image::RgbaImage;

use crate::error::Result;

/// Converts SVG documents into RGBA rasters
///
/// This is an optional capability: a build without the `svg` feature has no
/// implementation, and callers check for its presence before asking for a
/// vector logo on raster output.
pub trait VectorRasterizer {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Rasterize `svg` onto a transparent `width` x `height` canvas, scaled
    /// uniformly to fit and centered
    fn rasterize(&self, svg: &[u8], width: u32, height: u32) -> Result<RgbaImage>;
}

/// The rasterizer compiled into this build, if any
pub fn available() -> Option<Box<dyn VectorRasterizer>> {
    #[cfg(feature = "svg")]
    {
        Some(Box::new(ResvgRasterizer::new()))
    }

    #[cfg(not(feature = "svg"))]
    {
        None
    }
}

/// Scale and offsets that fit a `src` box inside a `dst` box, centered
pub fn fit_transform(src: (f32, f32), dst: (f32, f32)) -> (f32, f32, f32) {
    let scale = (dst.0 / src.0).min(dst.1 / src.1);
    let tx = (dst.0 - src.0 * scale) / 2.0;
    let ty = (dst.1 - src.1 * scale) / 2.0;
    (scale, tx, ty)
}

#[cfg(feature = "svg")]
pub use self::resvg_backend::ResvgRasterizer;

#[cfg(feature = "svg")]
mod resvg_backend {
    use image::{Rgba, RgbaImage};
    use resvg::{tiny_skia, usvg};

    use super::{fit_transform, VectorRasterizer};
    use crate::error::{BrandQrError, Result};

    /// SVG rasterizer backed by `resvg`
    ///
    /// `<text>` is drawn with the fonts installed on the system; without them
    /// text elements render as nothing.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ResvgRasterizer;

    impl ResvgRasterizer {
        pub const fn new() -> Self {
            Self
        }
    }

    impl VectorRasterizer for ResvgRasterizer {
        fn name(&self) -> &'static str {
            "resvg"
        }

        fn rasterize(&self, svg: &[u8], width: u32, height: u32) -> Result<RgbaImage> {
            let mut options = usvg::Options::default();
            options.fontdb_mut().load_system_fonts();

            let tree = usvg::Tree::from_data(svg, &options)
                .map_err(|e| BrandQrError::LogoLoad(format!("SVG parsing failed: {e}")))?;

            let size = tree.size();
            let (scale, tx, ty) = fit_transform(
                (size.width(), size.height()),
                (width as f32, height as f32),
            );

            let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
                BrandQrError::LogoLoad(format!("cannot allocate a {width}x{height} canvas"))
            })?;
            let transform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, tx, ty);
            resvg::render(&tree, transform, &mut pixmap.as_mut());

            // tiny-skia stores premultiplied alpha
            let pixels = pixmap.pixels();
            let image = RgbaImage::from_fn(width, height, |x, y| {
                let color = pixels[(y * width + x) as usize].demultiply();
                Rgba([color.red(), color.green(), color.blue(), color.alpha()])
            });

            log::debug!(
                "Rasterized {}x{} SVG onto {}x{} canvas (scale {:.3})",
                size.width(),
                size.height(),
                width,
                height,
                scale
            );

            Ok(image)
        }
    }
}
