use tracing::{debug, warn};

use crate::{
    foundation::core::{Extent, PixelRect},
    foundation::error::PixelPaneResult,
    raster::bitmap::Bitmap,
    render::backend::{Presenter, TextureHandle},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DeviceTexture {
    handle: TextureHandle,
    extent: Extent,
}

/// A replacement buffer and texture prepared by [`Layer::stage`].
#[derive(Debug)]
pub(crate) struct StagedLayer {
    bitmap: Bitmap,
    texture: StagedTexture,
}

#[derive(Debug)]
enum StagedTexture {
    Reused,
    Fresh(DeviceTexture),
}

impl StagedLayer {
    /// Give back a staged texture that will not be used.
    pub(crate) fn discard(self, presenter: &mut dyn Presenter) {
        if let StagedTexture::Fresh(tex) = self.texture
            && let Err(err) = presenter.destroy_texture(tex.handle)
        {
            warn!(handle = tex.handle.0, %err, "failed to destroy staged layer texture");
        }
    }
}

/// One raster layer: a bitmap plus its cached device texture.
///
/// Edits go through [`Layer::bitmap_mut`] and must be followed by [`Layer::invalidate`] (or
/// [`Layer::invalidate_region`]); [`Layer::validate`] is the only place that writes the device
/// texture and [`Layer::draw`] the only place that reads it.
#[derive(Debug)]
pub struct Layer {
    bitmap: Bitmap,
    opacity: f32,
    invalid: bool,
    dirty: Option<PixelRect>,
    texture: Option<DeviceTexture>,
}

impl Layer {
    /// Allocate a blank layer whose device texture already matches the blank buffer.
    pub fn new(presenter: &mut dyn Presenter, width: u32, height: u32) -> PixelPaneResult<Self> {
        let mut layer = Self {
            bitmap: Bitmap::default(),
            opacity: 1.0,
            invalid: false,
            dirty: None,
            texture: None,
        };
        layer.create(presenter, width, height, false)?;
        Ok(layer)
    }

    /// Reallocate the buffer at `width` x `height`.
    ///
    /// With `keep_old_data` the overlapping top-left rectangle of the previous buffer is
    /// copied and the layer is left dirty. Without it the buffer is blank and the texture is
    /// refreshed immediately. If allocation fails the layer is unchanged.
    pub fn create(
        &mut self,
        presenter: &mut dyn Presenter,
        width: u32,
        height: u32,
        keep_old_data: bool,
    ) -> PixelPaneResult<()> {
        let staged = self.stage(presenter, width, height, keep_old_data)?;
        self.apply_staged(presenter, staged);
        if keep_old_data {
            return Ok(());
        }
        self.validate(presenter)
    }

    /// Allocate the replacement buffer and, when the size changes, a new texture. Nothing
    /// on the layer changes until [`Layer::apply_staged`].
    pub(crate) fn stage(
        &self,
        presenter: &mut dyn Presenter,
        width: u32,
        height: u32,
        keep_old_data: bool,
    ) -> PixelPaneResult<StagedLayer> {
        let mut bitmap = Bitmap::blank(width, height)?;
        if keep_old_data && !self.bitmap.is_empty() {
            bitmap.copy_overlap_from(&self.bitmap);
        }
        let extent = bitmap.extent();
        let texture = match self.texture {
            Some(tex) if tex.extent == extent => StagedTexture::Reused,
            _ => StagedTexture::Fresh(DeviceTexture {
                handle: presenter.create_texture(extent)?,
                extent,
            }),
        };
        Ok(StagedLayer { bitmap, texture })
    }

    /// Swap in a staged allocation. The layer is left fully dirty.
    pub(crate) fn apply_staged(&mut self, presenter: &mut dyn Presenter, staged: StagedLayer) {
        let StagedLayer { bitmap, texture } = staged;
        if let StagedTexture::Fresh(tex) = texture
            && let Some(old) = self.texture.replace(tex)
            && let Err(err) = presenter.destroy_texture(old.handle)
        {
            warn!(handle = old.handle.0, %err, "failed to destroy replaced layer texture");
        }
        debug!(
            width = bitmap.width(),
            height = bitmap.height(),
            "layer allocated"
        );
        self.bitmap = bitmap;
        self.invalid = true;
        self.dirty = None;
    }

    /// The layer's pixels.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Mutable access to the layer's pixels. Does not mark the layer dirty.
    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }

    /// Buffer size.
    pub fn extent(&self) -> Extent {
        self.bitmap.extent()
    }

    /// Mark the whole buffer as changed.
    pub fn invalidate(&mut self) {
        self.invalid = true;
        self.dirty = None;
    }

    /// Mark `region` as changed. Has no extra effect after a full [`Layer::invalidate`].
    pub fn invalidate_region(&mut self, region: PixelRect) {
        if self.invalid {
            return;
        }
        let region = region.intersect(PixelRect::from_extent(self.bitmap.extent()));
        if region.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(prev) => prev.union(region),
            None => region,
        });
    }

    /// `true` while the device texture is behind the buffer.
    pub fn invalid(&self) -> bool {
        self.invalid || self.dirty.is_some()
    }

    /// Pending partial-update rectangle, if only a region is dirty.
    pub fn dirty_region(&self) -> Option<PixelRect> {
        if self.invalid { None } else { self.dirty }
    }

    /// Bring the device texture up to date. Does nothing when the layer is clean.
    pub fn validate(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        let Some(tex) = self.texture else {
            return Ok(());
        };
        if self.invalid {
            presenter.upload_full(tex.handle, &self.bitmap)?;
            debug!(width = tex.extent.width, height = tex.extent.height, "layer uploaded");
        } else if let Some(region) = self.dirty {
            presenter.upload_region(tex.handle, &self.bitmap, region)?;
            debug!(?region, "layer region uploaded");
        } else {
            return Ok(());
        }
        self.invalid = false;
        self.dirty = None;
        Ok(())
    }

    /// Set the draw opacity, clamped to `[0, 1]`. Does not dirty the layer.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    /// Current draw opacity.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Device texture handle, `None` after [`Layer::release`].
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture.map(|t| t.handle)
    }

    /// Validate, then draw with the current opacity.
    pub fn draw(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        self.validate(presenter)?;
        match self.texture {
            Some(tex) => presenter.draw_texture(tex.handle, self.opacity),
            None => Ok(()),
        }
    }

    /// Free the buffer and the device texture.
    pub fn release(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        self.bitmap.take();
        self.invalid = false;
        self.dirty = None;
        match self.texture.take() {
            Some(tex) => presenter.destroy_texture(tex.handle),
            None => Ok(()),
        }
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        if let Some(tex) = self.texture {
            warn!(handle = tex.handle.0, "layer dropped without releasing its texture");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/layer.rs"]
mod tests;
