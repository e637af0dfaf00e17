use std::{path::PathBuf, time::Duration};

use crate::{foundation::core::Extent, window::context::WindowContext};

/// A point in canvas pixels. May lie outside the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct CanvasPoint {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// Application callbacks driven by a [`crate::PixelWindow`].
///
/// Every method has a default, so an application only implements what it needs.
#[allow(unused_variables)]
pub trait PixelApp {
    /// Called once before the window is shown. Returning `false` aborts startup.
    fn on_startup(&mut self, ctx: &mut WindowContext) -> bool {
        true
    }

    /// Called once per frame. Returning `false` closes the window without asking
    /// [`PixelApp::on_try_close`].
    fn on_update(&mut self, ctx: &mut WindowContext, elapsed: Duration) -> bool {
        true
    }

    /// Called when the user asks to close the window. Returning `false` keeps it open.
    fn on_try_close(&mut self, ctx: &mut WindowContext) -> bool {
        true
    }

    /// Called once after the window has been closed, before layers are released.
    fn on_shutdown(&mut self, ctx: &mut WindowContext) {}

    /// Offered the canvas size a resize would produce. May change it, or return `false` to
    /// keep the current size.
    fn try_resize(&mut self, ctx: &WindowContext, canvas: &mut Extent) -> bool {
        true
    }

    /// Called after the canvas size changed. Layer contents were kept where they overlap.
    fn on_resize(&mut self, ctx: &mut WindowContext, canvas: Extent) {}

    /// Files are dragged over the window at `at`. Return `true` to accept a drop.
    fn on_drag_files(&mut self, ctx: &WindowContext, files: &[PathBuf], at: CanvasPoint) -> bool {
        false
    }

    /// Files were dropped at `at` after [`PixelApp::on_drag_files`] accepted them.
    fn on_drop_files(&mut self, ctx: &mut WindowContext, files: &[PathBuf], at: CanvasPoint) {}
}
