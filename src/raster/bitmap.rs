use crate::{
    foundation::core::{Extent, PixelRect},
    foundation::error::{PixelPaneError, PixelPaneResult},
    raster::pixel::{Pixel, composite_over},
};

/// How [`Bitmap::draw_sub_image`] combines source pixels with the destination.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OverlayMode {
    /// Replace destination pixels unconditionally.
    Overwrite,
    /// Replace destination pixels only where the source is fully opaque.
    OpaqueOnly,
    /// Composite the source over the destination with [`composite_over`].
    #[default]
    Alpha,
}

/// An owned, row-major grid of [`Pixel`] values.
///
/// A live bitmap always has a non-zero width and height. The only zero-sized state is the
/// placeholder left behind by [`Bitmap::take`] (also the [`Default`] value), which owns no
/// storage and rejects every pixel access.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels_len", &self.pixels.len())
            .finish()
    }
}

impl Bitmap {
    /// Allocate a `width` x `height` bitmap with every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: Pixel) -> PixelPaneResult<Self> {
        if width == 0 || height == 0 {
            return Err(PixelPaneError::invalid_dimension(format!(
                "bitmap size must be positive, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| PixelPaneError::invalid_dimension("bitmap size overflow"))?;
        Ok(Self {
            width,
            height,
            pixels: vec![fill; len],
        })
    }

    /// Allocate a fully transparent bitmap.
    pub fn blank(width: u32, height: u32) -> PixelPaneResult<Self> {
        Self::new(width, height, Pixel::BLANK)
    }

    /// Build a bitmap from tightly packed straight-alpha RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> PixelPaneResult<Self> {
        let mut out = Self::blank(width, height)?;
        if bytes.len() != out.pixels.len() * 4 {
            return Err(PixelPaneError::validation(format!(
                "expected {} rgba8 bytes for {width}x{height}, got {}",
                out.pixels.len() * 4,
                bytes.len()
            )));
        }
        for (px, c) in out.pixels.iter_mut().zip(bytes.chunks_exact(4)) {
            *px = Pixel::new(c[0], c[1], c[2], c[3]);
        }
        Ok(out)
    }

    /// Copy an [`image::RgbaImage`] into a new bitmap.
    pub fn from_rgba_image(img: &image::RgbaImage) -> PixelPaneResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_rgba8(w, h, img.as_raw())
    }

    /// Copy this bitmap into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> PixelPaneResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8()).ok_or_else(|| {
            PixelPaneError::validation("cannot convert an empty bitmap into an image")
        })
    }

    /// Move the contents out, leaving the zero-sized placeholder behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Width in pixels (0 for the placeholder).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (0 for the placeholder).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// `true` for the storage-less placeholder.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// One row, or `None` when `y` is outside the bitmap.
    pub fn row(&self, y: i32) -> Option<&[Pixel]> {
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// One mutable row, or `None` when `y` is outside the bitmap.
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [Pixel]> {
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        let start = y as usize * self.width as usize;
        let w = self.width as usize;
        Some(&mut self.pixels[start..start + w])
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|px| px.to_array()).collect()
    }

    /// Straight-alpha RGBA8 bytes of `region` (clipped to the bitmap), row-major.
    pub fn region_to_rgba8(&self, region: PixelRect) -> Vec<u8> {
        let region = region.intersect(PixelRect::from_extent(self.extent()));
        let mut out = Vec::with_capacity(region.width as usize * region.height as usize * 4);
        for y in region.y..region.bottom() {
            let start = y as usize * self.width as usize + region.x as usize;
            for px in &self.pixels[start..start + region.width as usize] {
                out.extend_from_slice(&px.to_array());
            }
        }
        out
    }

    /// Read the pixel at (`x`, `y`).
    pub fn get(&self, x: i32, y: i32) -> PixelPaneResult<Pixel> {
        let idx = self.index_of(x, y, "get")?;
        Ok(self.pixels[idx])
    }

    /// Overwrite the pixel at (`x`, `y`).
    pub fn set(&mut self, x: i32, y: i32, value: Pixel) -> PixelPaneResult<()> {
        let idx = self.index_of(x, y, "set")?;
        self.pixels[idx] = value;
        Ok(())
    }

    /// Composite `value` over the pixel at (`x`, `y`).
    pub fn draw_pixel(&mut self, x: i32, y: i32, value: Pixel) -> PixelPaneResult<()> {
        let idx = self.index_of(x, y, "draw_pixel")?;
        self.pixels[idx] = composite_over(self.pixels[idx], value);
        Ok(())
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    /// Draw `source` with its top-left corner at (`start_x`, `start_y`).
    ///
    /// Parts outside this bitmap are clipped; a placement with no overlap draws nothing.
    pub fn draw_sub_image(&mut self, source: &Bitmap, start_x: i32, start_y: i32, mode: OverlayMode) {
        let Some(span) = BlitSpan::clip(self.extent(), source.extent(), start_x, start_y) else {
            return;
        };

        let dst_w = self.width as usize;
        let src_w = source.width as usize;
        for row in 0..span.height {
            let d = (span.dst_y + row) * dst_w + span.dst_x;
            let s = (span.src_y + row) * src_w + span.src_x;
            let dst = &mut self.pixels[d..d + span.width];
            let src = &source.pixels[s..s + span.width];

            match mode {
                OverlayMode::Overwrite => dst.copy_from_slice(src),
                OverlayMode::OpaqueOnly => {
                    for (d, s) in dst.iter_mut().zip(src) {
                        if s.is_opaque() {
                            *d = *s;
                        }
                    }
                }
                OverlayMode::Alpha => {
                    for (d, s) in dst.iter_mut().zip(src) {
                        *d = composite_over(*d, *s);
                    }
                }
            }
        }
    }

    /// Copy the overlapping top-left rectangle of `previous` into this bitmap, row by row.
    pub(crate) fn copy_overlap_from(&mut self, previous: &Bitmap) {
        let w = self.width.min(previous.width) as usize;
        let h = self.height.min(previous.height) as usize;
        let dst_w = self.width as usize;
        let src_w = previous.width as usize;
        for y in 0..h {
            self.pixels[y * dst_w..y * dst_w + w]
                .copy_from_slice(&previous.pixels[y * src_w..y * src_w + w]);
        }
    }

    fn index_of(&self, x: i32, y: i32, op: &str) -> PixelPaneResult<usize> {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(ux), Ok(uy)) if ux < self.width && uy < self.height => {
                Ok(uy as usize * self.width as usize + ux as usize)
            }
            _ => Err(PixelPaneError::out_of_bounds(format!(
                "Bitmap::{op} at ({x}, {y}) outside {}x{}",
                self.width, self.height
            ))),
        }
    }
}

/// Visible part of a blit, in buffer coordinates of both bitmaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BlitSpan {
    dst_x: usize,
    dst_y: usize,
    src_x: usize,
    src_y: usize,
    width: usize,
    height: usize,
}

impl BlitSpan {
    fn clip(dst: Extent, src: Extent, start_x: i32, start_y: i32) -> Option<Self> {
        let (src_x, dst_x) = clip_axis(start_x, src.width, dst.width)?;
        let (src_y, dst_y) = clip_axis(start_y, src.height, dst.height)?;
        let width = (src.width as usize - src_x).min(dst.width as usize - dst_x);
        let height = (src.height as usize - src_y).min(dst.height as usize - dst_y);
        Some(Self {
            dst_x,
            dst_y,
            src_x,
            src_y,
            width,
            height,
        })
    }
}

/// Start offsets into (source, destination) along one axis, or `None` when nothing overlaps.
fn clip_axis(start: i32, src_len: u32, dst_len: u32) -> Option<(usize, usize)> {
    let start = i64::from(start);
    let (src_start, dst_start) = if start < 0 { (-start, 0) } else { (0, start) };
    if src_start >= i64::from(src_len) || dst_start >= i64::from(dst_len) {
        return None;
    }
    Some((src_start as usize, dst_start as usize))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/bitmap.rs"]
mod tests;
