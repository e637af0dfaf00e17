use crate::{
    foundation::core::{Extent, Magnification},
    foundation::error::PixelPaneResult,
    layer::{canvas::Canvas, layer::Layer},
    raster::pixel::Pixel,
    resize::config::WindowState,
    window::runtime::Runtime,
};

/// Window state visible to [`crate::PixelApp`] callbacks.
#[derive(Debug)]
pub struct WindowContext {
    pub(crate) title: String,
    pub(crate) canvas: Canvas,
    pub(crate) magnification: Magnification,
    pub(crate) state: WindowState,
    pub(crate) clear_color: Pixel,
    pub(crate) runtime: Runtime,
}

impl WindowContext {
    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Canvas width in logical pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Canvas height in logical pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Canvas size.
    pub fn extent(&self) -> Extent {
        self.canvas.extent()
    }

    /// Current magnification.
    pub fn magnification(&self) -> Magnification {
        self.magnification
    }

    /// Current window state.
    pub fn state(&self) -> WindowState {
        self.state
    }

    /// Color shown around and under the canvas.
    pub fn clear_color(&self) -> Pixel {
        self.clear_color
    }

    /// Change the clear color.
    pub fn set_clear_color(&mut self, color: Pixel) {
        self.clear_color = color;
    }

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.canvas.layer_count()
    }

    /// Layer `index`, 0 being the base.
    pub fn layer(&self, index: usize) -> PixelPaneResult<&Layer> {
        self.canvas.layer(index)
    }

    /// Mutable layer `index`, 0 being the base.
    pub fn layer_mut(&mut self, index: usize) -> PixelPaneResult<&mut Layer> {
        self.canvas.layer_mut(index)
    }

    /// The layer stack.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Whole milliseconds since startup.
    pub fn runtime_milliseconds(&self) -> u64 {
        self.runtime.milliseconds()
    }

    /// Fractional millisecond carry.
    pub fn runtime_sub_milliseconds(&self) -> f64 {
        self.runtime.sub_milliseconds()
    }
}
