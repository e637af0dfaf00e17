use super::*;
use crate::{
    foundation::core::PixelRect,
    raster::{bitmap::Bitmap, pixel::Pixel},
    render::{
        backend::{FrameTarget, TextureHandle},
        software::SoftwarePresenter,
    },
};

#[test]
fn layer_count_is_extra_plus_base() {
    let mut p = SoftwarePresenter::new();
    let mut canvas = Canvas::new(&mut p, Extent::new(8, 4), 2).unwrap();
    assert_eq!(canvas.layer_count(), 3);
    assert!(canvas.layers().iter().all(|l| l.extent() == Extent::new(8, 4)));
    assert!(canvas.layers().iter().all(|l| !l.invalid()));
    assert_eq!(p.texture_count(), 3);
    canvas.release(&mut p).unwrap();
    assert_eq!(p.texture_count(), 0);
}

#[test]
fn rejects_too_many_layers_without_allocating() {
    let mut p = SoftwarePresenter::new();
    let err = Canvas::new(&mut p, Extent::new(2, 2), MAX_EXTRA_LAYERS + 1).unwrap_err();
    assert!(matches!(err, PixelPaneError::UnsupportedConfiguration(_)));
    assert_eq!(p.stats().textures_created, 0);

    let err = Canvas::new(&mut p, Extent::new(0, 2), 0).unwrap_err();
    assert!(matches!(err, PixelPaneError::InvalidDimension(_)));
    assert_eq!(p.stats().textures_created, 0);
}

#[test]
fn bad_layer_index_reports_count() {
    let mut p = SoftwarePresenter::new();
    let mut canvas = Canvas::new(&mut p, Extent::new(2, 2), 1).unwrap();
    assert!(canvas.layer(1).is_ok());
    let err = canvas.layer_mut(2).unwrap_err();
    assert!(matches!(
        err,
        PixelPaneError::InvalidLayerIndex { index: 2, count: 2 }
    ));
    canvas.release(&mut p).unwrap();
}

#[test]
fn resize_keeps_pixels_and_dirties_all_layers() {
    let mut p = SoftwarePresenter::new();
    let mut canvas = Canvas::new(&mut p, Extent::new(2, 2), 1).unwrap();
    canvas
        .layer_mut(1)
        .unwrap()
        .bitmap_mut()
        .set(1, 1, Pixel::WHITE)
        .unwrap();

    canvas.resize(&mut p, Extent::new(3, 3)).unwrap();
    assert_eq!(canvas.extent(), Extent::new(3, 3));
    assert!(canvas.layers().iter().all(|l| l.invalid()));
    assert_eq!(
        canvas.layer(1).unwrap().bitmap().get(1, 1).unwrap(),
        Pixel::WHITE
    );

    canvas.validate_all(&mut p).unwrap();
    assert!(canvas.layers().iter().all(|l| !l.invalid()));
    assert!(canvas.resize(&mut p, Extent::ZERO).is_err());
    assert_eq!(canvas.extent(), Extent::new(3, 3));
    canvas.release(&mut p).unwrap();
}

/// Delegates to the software presenter until its texture budget runs out.
struct LimitedPresenter {
    inner: SoftwarePresenter,
    creates_left: usize,
}

impl Presenter for LimitedPresenter {
    fn create_texture(&mut self, extent: Extent) -> PixelPaneResult<TextureHandle> {
        if self.creates_left == 0 {
            return Err(PixelPaneError::presentation("out of texture memory"));
        }
        self.creates_left -= 1;
        self.inner.create_texture(extent)
    }

    fn upload_full(
        &mut self,
        handle: TextureHandle,
        bitmap: &Bitmap,
    ) -> PixelPaneResult<()> {
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

    fn destroy_texture(&mut self, handle: TextureHandle) -> PixelPaneResult<()> {
        self.inner.destroy_texture(handle)
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
fn failed_resize_leaves_every_layer_untouched() {
    let mut p = LimitedPresenter {
        inner: SoftwarePresenter::new(),
        creates_left: 3,
    };
    let mut canvas = Canvas::new(&mut p, Extent::new(4, 4), 1).unwrap();
    canvas
        .layer_mut(0)
        .unwrap()
        .bitmap_mut()
        .set(3, 3, Pixel::WHITE)
        .unwrap();
    let handles: Vec<_> = canvas.layers().iter().map(|l| l.texture()).collect();

    let err = canvas.resize(&mut p, Extent::new(8, 8)).unwrap_err();
    assert!(matches!(err, PixelPaneError::Presentation(_)));
    assert_eq!(canvas.extent(), Extent::new(4, 4));
    assert!(
        canvas
            .layers()
            .iter()
            .all(|l| l.extent() == Extent::new(4, 4))
    );
    assert_eq!(
        canvas.layers().iter().map(|l| l.texture()).collect::<Vec<_>>(),
        handles
    );
    assert_eq!(
        canvas.layer(0).unwrap().bitmap().get(3, 3).unwrap(),
        Pixel::WHITE
    );
    // the one texture staged before the failure was given back
    assert_eq!(p.inner.texture_count(), 2);
    assert_eq!(p.inner.stats().textures_destroyed, 1);

    p.creates_left = 2;
    canvas.resize(&mut p, Extent::new(8, 8)).unwrap();
    assert!(
        canvas
            .layers()
            .iter()
            .all(|l| l.extent() == Extent::new(8, 8))
    );
    assert_eq!(p.inner.texture_count(), 2);
    canvas.release(&mut p).unwrap();
}
