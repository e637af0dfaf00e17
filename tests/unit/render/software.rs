use super::*;
use crate::{foundation::core::Magnification, render::backend::Viewport};

fn target(client: Extent, viewport: Viewport, mag: u16) -> FrameTarget {
    FrameTarget {
        client,
        viewport,
        magnification: Magnification::new(mag, mag).unwrap(),
        clear: Pixel::rgb(0x10, 0x10, 0x10),
    }
}

#[test]
fn upload_and_readback() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(2, 2)).unwrap();
    assert_eq!(p.texture_pixel(h, 1, 1).unwrap(), Pixel::BLANK);

    let mut bmp = Bitmap::blank(2, 2).unwrap();
    bmp.set(1, 1, Pixel::rgb(0xFF, 0, 0)).unwrap();
    p.upload_full(h, &bmp).unwrap();
    assert_eq!(p.texture_pixel(h, 1, 1).unwrap(), Pixel::rgb(0xFF, 0, 0));
    assert_eq!(p.stats().full_uploads, 1);
}

#[test]
fn region_upload_touches_only_region() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(3, 3)).unwrap();
    let bmp = Bitmap::new(3, 3, Pixel::WHITE).unwrap();
    p.upload_region(h, &bmp, PixelRect::new(1, 1, 1, 5)).unwrap();

    assert_eq!(p.texture_pixel(h, 1, 1).unwrap(), Pixel::WHITE);
    assert_eq!(p.texture_pixel(h, 1, 2).unwrap(), Pixel::WHITE);
    assert_eq!(p.texture_pixel(h, 0, 1).unwrap(), Pixel::BLANK);
    assert_eq!(p.texture_pixel(h, 1, 0).unwrap(), Pixel::BLANK);
    assert_eq!(p.stats().region_uploads, 1);
}

#[test]
fn mismatched_or_unknown_textures_are_rejected() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(2, 2)).unwrap();
    let wrong = Bitmap::blank(3, 2).unwrap();
    assert!(matches!(
        p.upload_full(h, &wrong),
        Err(PixelPaneError::Presentation(_))
    ));
    p.destroy_texture(h).unwrap();
    assert!(p.destroy_texture(h).is_err());
    assert!(p.texture_pixel(h, 0, 0).is_err());
    assert!(p.create_texture(Extent::ZERO).is_err());
}

#[test]
fn draws_require_an_active_frame() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(1, 1)).unwrap();
    assert!(p.draw_texture(h, 1.0).is_err());
    assert!(p.end_frame().is_err());
}

#[test]
fn magnified_texture_lands_at_top_left_viewport() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(2, 1)).unwrap();
    let mut bmp = Bitmap::blank(2, 1).unwrap();
    bmp.set(0, 0, Pixel::rgb(0xFF, 0, 0)).unwrap();
    bmp.set(1, 0, Pixel::rgb(0, 0xFF, 0)).unwrap();
    p.upload_full(h, &bmp).unwrap();

    // 4x2 canvas area anchored at the top of a 5x3 client
    let client = Extent::new(5, 3);
    let vp = Viewport {
        x: 0,
        y: 1,
        width: 4,
        height: 2,
    };
    p.begin_frame(target(client, vp, 2)).unwrap();
    p.draw_texture(h, 1.0).unwrap();
    p.end_frame().unwrap();

    let f = p.last_frame().unwrap();
    assert_eq!((f.width, f.height), (5, 3));
    assert_eq!(f.pixel(0, 0), Some(Pixel::rgb(0xFF, 0, 0)));
    assert_eq!(f.pixel(1, 1), Some(Pixel::rgb(0xFF, 0, 0)));
    assert_eq!(f.pixel(2, 0), Some(Pixel::rgb(0, 0xFF, 0)));
    assert_eq!(f.pixel(3, 1), Some(Pixel::rgb(0, 0xFF, 0)));
    assert_eq!(f.pixel(4, 0), Some(Pixel::rgb(0x10, 0x10, 0x10)));
    assert_eq!(f.pixel(0, 2), Some(Pixel::rgb(0x10, 0x10, 0x10)));
    assert_eq!(f.pixel(5, 0), None);
    assert_eq!(p.stats().frames, 1);
}

#[test]
fn zero_opacity_draw_leaves_clear_color() {
    let mut p = SoftwarePresenter::new();
    let h = p.create_texture(Extent::new(1, 1)).unwrap();
    p.upload_full(h, &Bitmap::new(1, 1, Pixel::WHITE).unwrap())
        .unwrap();
    let vp = Viewport {
        x: 0,
        y: 0,
        width: 1,
        height: 1,
    };
    p.begin_frame(target(Extent::new(1, 1), vp, 1)).unwrap();
    p.draw_texture(h, 0.0).unwrap();
    p.end_frame().unwrap();
    assert_eq!(
        p.take_frame().unwrap().pixel(0, 0),
        Some(Pixel::rgb(0x10, 0x10, 0x10))
    );
    assert!(p.last_frame().is_none());
}
