use super::*;
use crate::{
    foundation::error::PixelPaneError,
    raster::pixel::Pixel,
    render::{backend::FrameTarget, software::SoftwarePresenter},
};

fn red() -> Pixel {
    Pixel::rgb(0xFF, 0, 0)
}

#[test]
fn new_layer_is_blank_and_clean() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 4, 3).unwrap();
    assert_eq!(layer.extent(), Extent::new(4, 3));
    assert!(!layer.invalid());
    assert!(layer.bitmap().pixels().iter().all(|&px| px == Pixel::BLANK));
    let h = layer.texture().unwrap();
    assert_eq!(p.texture_extent(h).unwrap(), Extent::new(4, 3));
    layer.release(&mut p).unwrap();
}

#[test]
fn keep_old_data_preserves_overlap_and_dirties() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 3, 3).unwrap();
    layer.bitmap_mut().clear(red());
    layer.create(&mut p, 5, 2, true).unwrap();

    assert!(layer.invalid());
    for y in 0..2 {
        for x in 0..5 {
            let expected = if x < 3 { red() } else { Pixel::BLANK };
            assert_eq!(layer.bitmap().get(x, y).unwrap(), expected);
        }
    }
    let h = layer.texture().unwrap();
    assert_eq!(p.texture_extent(h).unwrap(), Extent::new(5, 2));
    assert_eq!(p.texture_count(), 1);
    layer.release(&mut p).unwrap();
}

#[test]
fn discard_resize_is_blank_and_clean() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 3, 3).unwrap();
    layer.bitmap_mut().clear(red());
    layer.invalidate();
    layer.create(&mut p, 2, 2, false).unwrap();

    assert!(!layer.invalid());
    assert!(layer.bitmap().pixels().iter().all(|&px| px == Pixel::BLANK));
    let h = layer.texture().unwrap();
    assert_eq!(p.texture_pixel(h, 1, 1).unwrap(), Pixel::BLANK);
    layer.release(&mut p).unwrap();
}

#[test]
fn failed_create_leaves_layer_untouched() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 2, 2).unwrap();
    layer.bitmap_mut().clear(red());
    assert!(layer.create(&mut p, 0, 2, true).is_err());
    assert_eq!(layer.extent(), Extent::new(2, 2));
    assert_eq!(layer.bitmap().get(1, 1).unwrap(), red());
    layer.release(&mut p).unwrap();
}

#[test]
fn validate_uploads_once() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 2, 2).unwrap();
    let before = p.stats().full_uploads;

    layer.bitmap_mut().set(0, 0, red()).unwrap();
    layer.invalidate();
    layer.validate(&mut p).unwrap();
    layer.validate(&mut p).unwrap();

    assert_eq!(p.stats().full_uploads, before + 1);
    assert!(!layer.invalid());
    assert_eq!(p.texture_pixel(layer.texture().unwrap(), 0, 0).unwrap(), red());
    layer.release(&mut p).unwrap();
}

#[test]
fn region_invalidation_uses_partial_upload() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 4, 4).unwrap();
    layer.bitmap_mut().set(1, 1, red()).unwrap();
    layer.bitmap_mut().set(2, 3, red()).unwrap();
    layer.invalidate_region(PixelRect::new(1, 1, 1, 1));
    layer.invalidate_region(PixelRect::new(2, 3, 9, 9));
    assert_eq!(layer.dirty_region(), Some(PixelRect::new(1, 1, 3, 3)));

    let full = p.stats().full_uploads;
    layer.validate(&mut p).unwrap();
    assert_eq!(p.stats().full_uploads, full);
    assert_eq!(p.stats().region_uploads, 1);
    let h = layer.texture().unwrap();
    assert_eq!(p.texture_pixel(h, 2, 3).unwrap(), red());
    layer.release(&mut p).unwrap();
}

#[test]
fn full_invalidation_supersedes_region() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 4, 4).unwrap();
    layer.invalidate_region(PixelRect::new(0, 0, 1, 1));
    layer.invalidate();
    layer.invalidate_region(PixelRect::new(3, 3, 1, 1));
    assert_eq!(layer.dirty_region(), None);
    assert!(layer.invalid());

    layer.validate(&mut p).unwrap();
    assert_eq!(p.stats().region_uploads, 0);
    layer.release(&mut p).unwrap();
}

#[test]
fn opacity_is_clamped_and_does_not_dirty() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 1, 1).unwrap();
    layer.set_opacity(1.5);
    assert_eq!(layer.opacity(), 1.0);
    layer.set_opacity(-0.25);
    assert_eq!(layer.opacity(), 0.0);
    layer.set_opacity(f32::NAN);
    assert_eq!(layer.opacity(), 0.0);
    layer.set_opacity(0.5);
    assert_eq!(layer.opacity(), 0.5);
    assert!(!layer.invalid());
    layer.release(&mut p).unwrap();
}

#[test]
fn release_frees_texture() {
    let mut p = SoftwarePresenter::new();
    let mut layer = Layer::new(&mut p, 2, 2).unwrap();
    layer.release(&mut p).unwrap();
    assert_eq!(p.texture_count(), 0);
    assert!(layer.texture().is_none());
    assert!(layer.bitmap().is_empty());
    layer.release(&mut p).unwrap();
    layer.draw(&mut p).unwrap();
}

/// Software presenter whose texture destruction always fails.
#[derive(Default)]
struct StickyPresenter {
    inner: SoftwarePresenter,
}

impl Presenter for StickyPresenter {
    fn create_texture(&mut self, extent: Extent) -> PixelPaneResult<TextureHandle> {
        self.inner.create_texture(extent)
    }

    fn upload_full(&mut self, handle: TextureHandle, bitmap: &Bitmap) -> PixelPaneResult<()> {
        self.inner.upload_full(handle, bitmap)
    }

    fn upload_region(
        &mut self,
        handle: TextureHandle,
        bitmap: &Bitmap,
        region: PixelRect,
    ) -> PixelPaneResult<()> {
        self.inner.upload_region(handle, bitmap, region)
    }

    fn destroy_texture(&mut self, _handle: TextureHandle) -> PixelPaneResult<()> {
        Err(PixelPaneError::presentation("device lost"))
    }

    fn begin_frame(&mut self, target: FrameTarget) -> PixelPaneResult<()> {
        self.inner.begin_frame(target)
    }

    fn draw_texture(&mut self, handle: TextureHandle, opacity: f32) -> PixelPaneResult<()> {
        self.inner.draw_texture(handle, opacity)
    }

    fn end_frame(&mut self) -> PixelPaneResult<()> {
        self.inner.end_frame()
    }
}

#[test]
fn resize_keeps_new_texture_when_old_one_cannot_be_freed() {
    let mut p = StickyPresenter::default();
    let mut layer = Layer::new(&mut p, 2, 2).unwrap();
    let old = layer.texture().unwrap();

    layer.create(&mut p, 3, 3, true).unwrap();
    let new = layer.texture().unwrap();
    assert_ne!(new, old);
    assert_eq!(p.inner.texture_extent(new).unwrap(), Extent::new(3, 3));
    assert_eq!(layer.extent(), Extent::new(3, 3));

    layer.validate(&mut p).unwrap();
    assert!(!layer.invalid());
    assert!(layer.release(&mut p).is_err());
    assert!(layer.texture().is_none());
}
