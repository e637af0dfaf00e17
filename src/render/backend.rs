use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::core::{Extent, Magnification, PixelRect},
    foundation::error::PixelPaneResult,
    raster::{bitmap::Bitmap, composite::unpremultiply, pixel::Pixel},
};

/// Opaque handle to a device texture owned by a [`Presenter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

/// Placement of the magnified canvas inside the client area, in device pixels.
///
/// `y` is measured upward from the bottom edge of the client area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Viewport {
    /// Left edge.
    pub x: i32,
    /// Bottom edge, counted from the bottom of the client area.
    pub y: i32,
    /// Device-pixel width of the magnified canvas.
    pub width: u32,
    /// Device-pixel height of the magnified canvas.
    pub height: u32,
}

/// Everything a presenter needs to start a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTarget {
    /// Size of the client area being presented into.
    pub client: Extent,
    /// Where the canvas lands inside the client area.
    pub viewport: Viewport,
    /// Device pixels per canvas pixel.
    pub magnification: Magnification,
    /// Color of the client area outside (and under) the canvas.
    pub clear: Pixel,
}

/// Contract of the presentation backend.
///
/// Layers own one texture each. [`Presenter::draw_texture`] calls between
/// [`Presenter::begin_frame`] and [`Presenter::end_frame`] are composited in call order.
pub trait Presenter {
    /// Allocate a texture of `extent` texels.
    fn create_texture(&mut self, extent: Extent) -> PixelPaneResult<TextureHandle>;

    /// Replace the whole texture with `bitmap`, which must match its size.
    fn upload_full(&mut self, handle: TextureHandle, bitmap: &Bitmap) -> PixelPaneResult<()>;

    /// Replace `region` of the texture with the same region of `bitmap`.
    fn upload_region(
        &mut self,
        handle: TextureHandle,
        bitmap: &Bitmap,
        region: PixelRect,
    ) -> PixelPaneResult<()>;

    /// Free a texture. The handle must not be used afterwards.
    fn destroy_texture(&mut self, handle: TextureHandle) -> PixelPaneResult<()>;

    /// Clear the client area and prepare for draws.
    fn begin_frame(&mut self, target: FrameTarget) -> PixelPaneResult<()>;

    /// Composite a texture stretched over the viewport with a global opacity.
    fn draw_texture(&mut self, handle: TextureHandle, opacity: f32) -> PixelPaneResult<()>;

    /// Finish and present the frame.
    fn end_frame(&mut self) -> PixelPaneResult<()>;
}

/// A presented frame in RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes, top row first.
    pub data: Vec<u8>,
    /// Whether `data` holds premultiplied color.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha pixel at (`x`, `y`), top-left origin.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let c = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        Some(if self.premultiplied {
            unpremultiply(c)
        } else {
            Pixel::from_array(c)
        })
    }

    /// Straight-alpha copy of `data`.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        self.data
            .chunks_exact(4)
            .flat_map(|c| unpremultiply([c[0], c[1], c[2], c[3]]).to_array())
            .collect()
    }

    /// Write the frame as a straight-alpha PNG, creating parent directories.
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba8(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))
    }
}
