use crate::foundation::error::{PixelPaneError, PixelPaneResult};

/// A width/height pair in whole pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Extent {
    /// Horizontal size.
    pub width: u32,
    /// Vertical size.
    pub height: u32,
}

impl Extent {
    /// The empty extent.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Construct an extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either axis is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Per-axis minimum.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Per-axis maximum.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Per-axis saturating subtraction.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self::new(
            self.width.saturating_sub(other.width),
            self.height.saturating_sub(other.height),
        )
    }
}

/// Integer magnification: one logical pixel covers `x` by `y` device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Magnification {
    /// Device pixels per logical pixel, horizontally.
    pub x: u16,
    /// Device pixels per logical pixel, vertically.
    pub y: u16,
}

impl Default for Magnification {
    fn default() -> Self {
        Self::ONE
    }
}

impl Magnification {
    /// Identity magnification.
    pub const ONE: Self = Self { x: 1, y: 1 };

    /// Largest representable factor on either axis.
    pub const MAX: u16 = u16::MAX;

    /// Construct a magnification; both factors must be positive.
    pub fn new(x: u16, y: u16) -> PixelPaneResult<Self> {
        if x == 0 || y == 0 {
            return Err(PixelPaneError::unsupported(format!(
                "magnification must be positive on both axes, got {x}x{y}"
            )));
        }
        Ok(Self { x, y })
    }

    /// The same x:y ratio in lowest terms; every magnification with this ratio is a whole
    /// multiple of it.
    pub fn reduced(self) -> Self {
        let (mut a, mut b) = (self.x.max(1), self.y.max(1));
        while b != 0 {
            (a, b) = (b, a % b);
        }
        Self {
            x: self.x.max(1) / a,
            y: self.y.max(1) / a,
        }
    }

    /// `self` repeated `k` times on both axes, saturating at [`Magnification::MAX`].
    pub fn times(self, k: u32) -> Self {
        let mul = |v: u16| -> u16 {
            u16::try_from(u64::from(v) * u64::from(k.max(1))).unwrap_or(Self::MAX)
        };
        Self {
            x: mul(self.x),
            y: mul(self.y),
        }
    }

    /// Device-pixel size of `canvas` under this magnification, saturating at `u32::MAX`.
    pub fn scale(self, canvas: Extent) -> Extent {
        fn mul(a: u32, b: u16) -> u32 {
            u32::try_from(u64::from(a) * u64::from(b)).unwrap_or(u32::MAX)
        }
        Extent::new(mul(canvas.width, self.x), mul(canvas.height, self.y))
    }
}

/// Axis-aligned rectangle in buffer coordinates (origin top-left).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct PixelRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl PixelRect {
    /// Construct a rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole buffer of the given size.
    pub const fn from_extent(extent: Extent) -> Self {
        Self::new(0, 0, extent.width, extent.height)
    }

    /// `true` when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Smallest rectangle containing both; empty operands are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Overlap of both rectangles, or an empty rectangle.
    pub fn intersect(self, other: Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r <= x || b <= y {
            return Self::default();
        }
        Self::new(x, y, r - x, b - y)
    }
}

/// A host window rectangle in screen coordinates (edges, right/bottom exclusive).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ClientRect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge.
    pub right: i32,
    /// Bottom edge.
    pub bottom: i32,
}

impl ClientRect {
    /// Construct a rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle of `extent` placed at (`left`, `top`).
    pub fn from_origin(left: i32, top: i32, extent: Extent) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(clamp_i32(extent.width)),
            top.saturating_add(clamp_i32(extent.height)),
        )
    }

    /// Width, zero when the edges are inverted.
    pub fn width(self) -> u32 {
        u32::try_from(i64::from(self.right) - i64::from(self.left)).unwrap_or(0)
    }

    /// Height, zero when the edges are inverted.
    pub fn height(self) -> u32 {
        u32::try_from(i64::from(self.bottom) - i64::from(self.top)).unwrap_or(0)
    }

    /// Width and height.
    pub fn extent(self) -> Extent {
        Extent::new(self.width(), self.height())
    }
}

pub(crate) fn clamp_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
