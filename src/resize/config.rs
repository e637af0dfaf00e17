use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::{Extent, Magnification},
    foundation::error::{PixelPaneError, PixelPaneResult},
    layer::canvas::MAX_EXTRA_LAYERS,
    raster::pixel::Pixel,
};

/// What gives way when the user resizes the window.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// The window cannot be resized.
    None,
    /// The canvas grows or shrinks; magnification is fixed.
    #[default]
    Canvas,
    /// The magnification changes; the canvas size is fixed.
    Pixels,
}

/// Initial placement of the window.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    /// A regular framed window.
    #[default]
    Normal,
    /// A framed window filling the work area.
    Maximized,
    /// A borderless window covering the monitor.
    Fullscreen,
}

/// Host-imposed window size floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlatformLimits {
    /// Smallest outer window size the host allows.
    pub min_window: Extent,
    /// Outer window size minus client size (borders and title bar).
    pub frame_overhead: Extent,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        Self {
            min_window: Extent::new(136, 39),
            frame_overhead: Extent::new(16, 39),
        }
    }
}

impl PlatformLimits {
    /// Limits that impose no floor at all.
    pub const fn unconstrained() -> Self {
        Self {
            min_window: Extent::ZERO,
            frame_overhead: Extent::ZERO,
        }
    }

    /// Smallest client area the host allows.
    pub fn min_client(self) -> Extent {
        self.min_window.saturating_sub(self.frame_overhead)
    }
}

/// Window and canvas setup.
///
/// `min_*`/`max_*` bound the canvas size in [`ResizeMode::Canvas`] and the magnification in
/// [`ResizeMode::Pixels`]; 0 means unconstrained. They are ignored in [`ResizeMode::None`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Window title.
    pub title: String,
    /// Canvas width in logical pixels.
    pub width: u32,
    /// Canvas height in logical pixels.
    pub height: u32,
    /// Horizontal magnification.
    pub pixel_width: u16,
    /// Vertical magnification.
    pub pixel_height: u16,
    /// Resize behavior.
    pub resize_mode: ResizeMode,
    /// Lower horizontal bound (0 = none).
    pub min_width: u32,
    /// Lower vertical bound (0 = none).
    pub min_height: u32,
    /// Upper horizontal bound (0 = none).
    pub max_width: u32,
    /// Upper vertical bound (0 = none).
    pub max_height: u32,
    /// In [`ResizeMode::Pixels`], keep the pixel aspect ratio of `pixel_width:pixel_height`.
    pub keep_aspect_ratio: bool,
    /// Layers stacked over the base layer.
    pub extra_layers: usize,
    /// Color of the client area around and under the canvas.
    pub clear_color: Pixel,
    /// Initial window state.
    pub state: WindowState,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "pixelpane".to_owned(),
            width: 1000,
            height: 500,
            pixel_width: 1,
            pixel_height: 1,
            resize_mode: ResizeMode::Canvas,
            min_width: 0,
            min_height: 0,
            max_width: 0,
            max_height: 0,
            keep_aspect_ratio: false,
            extra_layers: 0,
            clear_color: Pixel::BLACK,
            state: WindowState::Normal,
        }
    }
}

impl WindowConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PixelPaneResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PixelPaneError::validation(format!("parse window config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PixelPaneResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PixelPaneError::validation(format!("open window config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> PixelPaneResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Canvas size.
    pub fn canvas(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Configured magnification.
    pub fn magnification(&self) -> PixelPaneResult<Magnification> {
        Magnification::new(self.pixel_width, self.pixel_height)
    }

    /// Lower bounds from `min_width`/`min_height`.
    pub fn min_bounds(&self) -> Extent {
        Extent::new(self.min_width, self.min_height)
    }

    /// Upper bounds from `max_width`/`max_height` (0 = none).
    pub fn max_bounds(&self) -> Extent {
        Extent::new(self.max_width, self.max_height)
    }

    /// Reject configurations that no window could satisfy.
    pub fn validate(&self, limits: &PlatformLimits) -> PixelPaneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PixelPaneError::invalid_dimension(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let mag = self.magnification()?;
        if self.extra_layers > MAX_EXTRA_LAYERS {
            return Err(PixelPaneError::unsupported(format!(
                "at most {MAX_EXTRA_LAYERS} extra layers are supported, got {}",
                self.extra_layers
            )));
        }
        check_axis("width", self.min_width, self.max_width)?;
        check_axis("height", self.min_height, self.max_height)?;

        let floor = limits.min_client();
        match self.resize_mode {
            ResizeMode::None => {
                let client = mag.scale(self.canvas());
                if client.width < floor.width || client.height < floor.height {
                    return Err(PixelPaneError::unsupported(format!(
                        "fixed client {}x{} is below the platform minimum {}x{}",
                        client.width, client.height, floor.width, floor.height
                    )));
                }
                Ok(())
            }
            ResizeMode::Canvas => {
                let min = min_canvas_for(floor, mag).max(self.min_bounds());
                check_value("canvas width", self.width, min.width, self.max_width)?;
                check_value("canvas height", self.height, min.height, self.max_height)
            }
            ResizeMode::Pixels => {
                let limit = u32::from(Magnification::MAX);
                let bounds = [self.min_width, self.min_height, self.max_width, self.max_height];
                if bounds.iter().any(|&v| v > limit) {
                    return Err(PixelPaneError::unsupported(format!(
                        "pixel size bounds must not exceed {limit}"
                    )));
                }
                let min = min_magnification_for(floor, self.canvas());
                let min_x = u32::from(min.x).max(self.min_width);
                let min_y = u32::from(min.y).max(self.min_height);
                check_value("pixel width", u32::from(mag.x), min_x, self.max_width)?;
                check_value("pixel height", u32::from(mag.y), min_y, self.max_height)
            }
        }
    }
}

/// Smallest canvas whose magnified size covers `floor`, at least 1x1.
pub(crate) fn min_canvas_for(floor: Extent, mag: Magnification) -> Extent {
    Extent::new(
        floor.width.div_ceil(u32::from(mag.x)).max(1),
        floor.height.div_ceil(u32::from(mag.y)).max(1),
    )
}

/// Smallest magnification that makes `canvas` cover `floor`, at least 1x1.
pub(crate) fn min_magnification_for(floor: Extent, canvas: Extent) -> Magnification {
    let axis = |floor: u32, len: u32| -> u16 {
        let v = floor.div_ceil(len.max(1)).max(1);
        u16::try_from(v).unwrap_or(Magnification::MAX)
    };
    Magnification {
        x: axis(floor.width, canvas.width),
        y: axis(floor.height, canvas.height),
    }
}

fn check_axis(axis: &str, min: u32, max: u32) -> PixelPaneResult<()> {
    if max != 0 && min > max {
        return Err(PixelPaneError::unsupported(format!(
            "min {axis} {min} exceeds max {axis} {max}"
        )));
    }
    Ok(())
}

fn check_value(what: &str, value: u32, min: u32, max: u32) -> PixelPaneResult<()> {
    if max != 0 && min > max {
        return Err(PixelPaneError::unsupported(format!(
            "{what} floor {min} exceeds configured max {max}"
        )));
    }
    if value < min {
        return Err(PixelPaneError::unsupported(format!(
            "{what} {value} is below the minimum {min}"
        )));
    }
    if max != 0 && value > max {
        return Err(PixelPaneError::unsupported(format!(
            "{what} {value} is above the maximum {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/resize/config.rs"]
mod tests;
