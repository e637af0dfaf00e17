use super::*;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<TextRasterizer> {
    let env = std::env::var("PIXELPANE_TEST_FONT").ok();
    let path = env
        .as_deref()
        .into_iter()
        .chain(FONT_CANDIDATES.iter().copied())
        .find(|p| Path::new(p).is_file())?;
    Some(TextRasterizer::from_path(path).unwrap())
}

#[test]
fn garbage_bytes_are_rejected() {
    let err = TextRasterizer::from_font_bytes(vec![0, 1, 2, 3]).unwrap_err();
    assert!(matches!(err, PixelPaneError::Text(_)));
}

#[test]
fn missing_font_file_is_reported() {
    let err = TextRasterizer::from_path("/no/such/font.ttf").unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn renders_glyph_coverage() {
    let Some(mut text) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    assert!(!text.family_name().trim().is_empty());

    let bmp = text.rasterize("Lorem", &TextStyle::default()).unwrap();
    assert!(bmp.width() > 1 && bmp.height() > 1);
    assert!(bmp.pixels().iter().any(|p| p.alpha > 0));
}

#[test]
fn aliased_text_is_binary() {
    let Some(mut text) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let color = Pixel::rgb(0x20, 0x40, 0x60);
    let style = TextStyle {
        size_px: 16.0,
        color,
        antialias: false,
    };
    let bmp = text.rasterize("Ipsum", &style).unwrap();
    assert!(bmp.pixels().iter().all(|&p| p == color || p == Pixel::BLANK));
    assert!(bmp.pixels().contains(&color));
}

#[test]
fn empty_text_and_bad_size() {
    let Some(mut text) = system_font() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let bmp = text.rasterize("", &TextStyle::default()).unwrap();
    assert!(bmp.width() >= 1 && bmp.height() >= 1);

    let style = TextStyle {
        size_px: 0.0,
        ..TextStyle::default()
    };
    assert!(text.rasterize("x", &style).is_err());
}
