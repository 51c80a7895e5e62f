use brandqr::rasterizer::fit_transform;

#[test]
fn test_fit_transform_square() {
    let (scale, tx, ty) = fit_transform((10.0, 10.0), (1024.0, 1024.0));
    assert!((scale - 102.4).abs() < 1e-4);
    assert!(tx.abs() < 1e-4);
    assert!(ty.abs() < 1e-4);
}

#[test]
fn test_fit_transform_wide_source_is_letterboxed() {
    let (scale, tx, ty) = fit_transform((20.0, 10.0), (100.0, 100.0));
    assert!((scale - 5.0).abs() < 1e-6);
    assert!(tx.abs() < 1e-6);
    assert!((ty - 25.0).abs() < 1e-6);
}

#[cfg(feature = "svg")]
mod resvg_backend {
    use brandqr::rasterizer::{self, ResvgRasterizer};
    use brandqr::{BrandQrError, VectorRasterizer};

    const WIDE_LOGO: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10" viewBox="0 0 20 10"><rect width="20" height="10" fill="#1040c0"/></svg>"##;

    #[test]
    fn test_available_with_feature() {
        let rasterizer = rasterizer::available().expect("resvg should be compiled in");
        assert_eq!(rasterizer.name(), "resvg");
    }

    #[test]
    fn test_rasterize_fits_and_centers() {
        let image = ResvgRasterizer::new()
            .rasterize(WIDE_LOGO.as_bytes(), 64, 64)
            .unwrap();
        assert_eq!(image.dimensions(), (64, 64));

        // 20x10 scaled to 64x32, centered vertically
        assert_eq!(image.get_pixel(32, 0)[3], 0);
        assert_eq!(image.get_pixel(32, 63)[3], 0);

        let center = image.get_pixel(32, 32);
        assert_eq!(center[3], 255);
        assert!(center[2] > 150 && center[0] < 60);
    }

    #[test]
    fn test_rasterize_draws_text_with_system_fonts() {
        let mut fonts = resvg::usvg::fontdb::Database::new();
        fonts.load_system_fonts();
        let Some(family) = fonts
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
        else {
            // No fonts installed
            return;
        };

        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="32" viewBox="0 0 64 32"><text x="2" y="26" font-size="28" font-family="{family}" fill="#000000">Hi</text></svg>"##
        );
        let image = ResvgRasterizer::new()
            .rasterize(svg.as_bytes(), 128, 64)
            .unwrap();
        assert!(image.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn test_rasterize_invalid_svg() {
        let err = ResvgRasterizer::new()
            .rasterize(b"definitely not svg", 16, 16)
            .unwrap_err();
        assert!(matches!(err, BrandQrError::LogoLoad(_)));
    }
}
