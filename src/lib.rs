//! pixelpane is a layered pixel-art canvas with integer magnification.
//!
//! A [`Canvas`] stacks equally sized [`Layer`]s of [`Pixel`]s. Each layer caches its bitmap in a
//! device texture owned by a [`Presenter`] and re-uploads it only after it was invalidated.
//! [`ResizeSolver`] turns a proposed window client size into a new canvas size or a new
//! magnification, depending on the [`ResizeMode`], while honoring configured and platform bounds.
//!
//! [`PixelWindow`] ties an application ([`PixelApp`]) to a canvas and a presenter and exposes the
//! events a host window integration forwards: updates, close requests, resize negotiation,
//! committed resizes, state changes, drag and drop, and rendering.
//!
//! [`SoftwarePresenter`] composites frames on the CPU and [`TextRasterizer`] renders strings into
//! bitmaps, so the whole pipeline runs headless.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod layer;
mod raster;
mod render;
mod resize;
mod text;
mod window;

pub use crate::foundation::core::{ClientRect, Extent, Magnification, PixelRect};
pub use crate::foundation::error::{PixelPaneError, PixelPaneResult};

pub use crate::layer::canvas::{Canvas, MAX_EXTRA_LAYERS};
pub use crate::layer::layer::Layer;
pub use crate::raster::bitmap::{Bitmap, OverlayMode};
pub use crate::raster::composite::{PremulRgba8, over, premultiply, unpremultiply};
pub use crate::raster::pixel::{Pixel, composite_over, parse_hex};
pub use crate::render::backend::{FrameRGBA, FrameTarget, Presenter, TextureHandle, Viewport};
pub use crate::render::software::{PresenterStats, SoftwarePresenter};
pub use crate::resize::config::{PlatformLimits, ResizeMode, WindowConfig, WindowState};
pub use crate::resize::solver::{ResizeOutcome, ResizeSolver, SolverBounds};
pub use crate::resize::trim::{DragEdge, apply_trim};
pub use crate::resize::viewport::place_viewport;
pub use crate::text::raster::{TextRasterizer, TextStyle};
pub use crate::window::app::{CanvasPoint, PixelApp};
pub use crate::window::context::WindowContext;
pub use crate::window::runtime::Runtime;
pub use crate::window::session::PixelWindow;
