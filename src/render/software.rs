use std::collections::HashMap;

use crate::{
    foundation::core::{Extent, PixelRect},
    foundation::error::{PixelPaneError, PixelPaneResult},
    raster::{
        bitmap::Bitmap,
        composite::{PremulRgba8, over, premultiply},
        pixel::Pixel,
    },
    render::backend::{FrameRGBA, FrameTarget, Presenter, TextureHandle},
};

/// Counters for work a [`SoftwarePresenter`] has performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PresenterStats {
    /// Textures allocated.
    pub textures_created: u64,
    /// Textures freed.
    pub textures_destroyed: u64,
    /// Whole-texture uploads.
    pub full_uploads: u64,
    /// Sub-region uploads.
    pub region_uploads: u64,
    /// Texture draws.
    pub draws: u64,
    /// Completed frames.
    pub frames: u64,
}

struct ActiveFrame {
    target: FrameTarget,
    data: Vec<PremulRgba8>,
}

/// In-process [`Presenter`] that keeps textures as bitmaps and composites frames on the CPU.
///
/// Textures are stretched over the viewport with nearest-neighbour sampling and blended with
/// the premultiplied `over` operator.
#[derive(Default)]
pub struct SoftwarePresenter {
    next_handle: u64,
    textures: HashMap<TextureHandle, Bitmap>,
    frame: Option<ActiveFrame>,
    last_frame: Option<FrameRGBA>,
    stats: PresenterStats,
}

impl std::fmt::Debug for SoftwarePresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwarePresenter")
            .field("textures", &self.textures.len())
            .field("frame_active", &self.frame.is_some())
            .field("stats", &self.stats)
            .finish()
    }
}

impl SoftwarePresenter {
    /// Presenter with no textures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Work counters.
    pub fn stats(&self) -> PresenterStats {
        self.stats
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Size of a live texture.
    pub fn texture_extent(&self, handle: TextureHandle) -> PixelPaneResult<Extent> {
        Ok(self.texture(handle)?.extent())
    }

    /// Read back one texel of a live texture.
    pub fn texture_pixel(&self, handle: TextureHandle, x: i32, y: i32) -> PixelPaneResult<Pixel> {
        self.texture(handle)?.get(x, y)
    }

    /// The most recently completed frame.
    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last_frame.as_ref()
    }

    /// Move the most recently completed frame out.
    pub fn take_frame(&mut self) -> Option<FrameRGBA> {
        self.last_frame.take()
    }

    fn texture(&self, handle: TextureHandle) -> PixelPaneResult<&Bitmap> {
        self.textures
            .get(&handle)
            .ok_or_else(|| PixelPaneError::presentation(format!("unknown texture {handle:?}")))
    }

    fn texture_for_upload(
        &mut self,
        handle: TextureHandle,
        bitmap: &Bitmap,
    ) -> PixelPaneResult<&mut Bitmap> {
        let tex = self
            .textures
            .get_mut(&handle)
            .ok_or_else(|| PixelPaneError::presentation(format!("unknown texture {handle:?}")))?;
        if tex.extent() != bitmap.extent() {
            return Err(PixelPaneError::presentation(format!(
                "upload size {}x{} does not match texture {}x{}",
                bitmap.width(),
                bitmap.height(),
                tex.width(),
                tex.height()
            )));
        }
        Ok(tex)
    }
}

impl Presenter for SoftwarePresenter {
    fn create_texture(&mut self, extent: Extent) -> PixelPaneResult<TextureHandle> {
        let bitmap = Bitmap::blank(extent.width, extent.height)?;
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        self.textures.insert(handle, bitmap);
        self.stats.textures_created += 1;
        Ok(handle)
    }

    fn upload_full(&mut self, handle: TextureHandle, bitmap: &Bitmap) -> PixelPaneResult<()> {
        let tex = self.texture_for_upload(handle, bitmap)?;
        tex.pixels_mut().copy_from_slice(bitmap.pixels());
        self.stats.full_uploads += 1;
        Ok(())
    }

    fn upload_region(
        &mut self,
        handle: TextureHandle,
        bitmap: &Bitmap,
        region: PixelRect,
    ) -> PixelPaneResult<()> {
        let tex = self.texture_for_upload(handle, bitmap)?;
        let region = region.intersect(PixelRect::from_extent(tex.extent()));
        let stride = tex.width() as usize;
        for y in region.y..region.bottom() {
            let start = y as usize * stride + region.x as usize;
            let end = start + region.width as usize;
            tex.pixels_mut()[start..end].copy_from_slice(&bitmap.pixels()[start..end]);
        }
        self.stats.region_uploads += 1;
        Ok(())
    }

    fn destroy_texture(&mut self, handle: TextureHandle) -> PixelPaneResult<()> {
        self.textures
            .remove(&handle)
            .ok_or_else(|| PixelPaneError::presentation(format!("unknown texture {handle:?}")))?;
        self.stats.textures_destroyed += 1;
        Ok(())
    }

    fn begin_frame(&mut self, target: FrameTarget) -> PixelPaneResult<()> {
        if self.frame.is_some() {
            return Err(PixelPaneError::presentation(
                "begin_frame called while a frame is active",
            ));
        }
        let clear = premultiply(target.clear);
        self.frame = Some(ActiveFrame {
            target,
            data: vec![clear; target.client.area()],
        });
        Ok(())
    }

    fn draw_texture(&mut self, handle: TextureHandle, opacity: f32) -> PixelPaneResult<()> {
        let Self {
            textures,
            frame,
            stats,
            ..
        } = self;
        let frame = frame
            .as_mut()
            .ok_or_else(|| PixelPaneError::presentation("draw_texture outside a frame"))?;
        let tex = textures
            .get(&handle)
            .ok_or_else(|| PixelPaneError::presentation(format!("unknown texture {handle:?}")))?;

        let t = frame.target;
        let client_w = i64::from(t.client.width);
        let client_h = i64::from(t.client.height);
        let mag_x = i64::from(t.magnification.x);
        let mag_y = i64::from(t.magnification.y);

        // viewport y counts from the bottom edge
        let left = i64::from(t.viewport.x);
        let top = client_h - (i64::from(t.viewport.y) + i64::from(t.viewport.height));
        let right = left + i64::from(t.viewport.width);
        let bottom = top + i64::from(t.viewport.height);

        for fy in top.max(0)..bottom.min(client_h) {
            let ty = (fy - top) / mag_y;
            let Some(row) = i32::try_from(ty).ok().and_then(|ty| tex.row(ty)) else {
                continue;
            };
            let out = &mut frame.data[(fy * client_w) as usize..((fy + 1) * client_w) as usize];
            for fx in left.max(0)..right.min(client_w) {
                let tx = ((fx - left) / mag_x) as usize;
                if let Some(&px) = row.get(tx) {
                    let dst = &mut out[fx as usize];
                    *dst = over(*dst, premultiply(px), opacity);
                }
            }
        }
        stats.draws += 1;
        Ok(())
    }

    fn end_frame(&mut self) -> PixelPaneResult<()> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| PixelPaneError::presentation("end_frame without begin_frame"))?;
        self.last_frame = Some(FrameRGBA {
            width: frame.target.client.width,
            height: frame.target.client.height,
            data: frame.data.into_iter().flatten().collect(),
            premultiplied: true,
        });
        self.stats.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/software.rs"]
mod tests;
