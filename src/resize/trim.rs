use std::str::FromStr;

use crate::{
    foundation::core::{ClientRect, Extent, clamp_i32},
    foundation::error::PixelPaneError,
};

/// Window edge or corner the user is dragging during a live resize.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DragEdge {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    #[default]
    BottomRight,
}

impl DragEdge {
    /// Whether the left side moves (otherwise the right side absorbs width changes).
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    /// Whether the top side moves (otherwise the bottom side absorbs height changes).
    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }
}

impl FromStr for DragEdge {
    type Err = PixelPaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "top_left" => Ok(Self::TopLeft),
            "top_right" => Ok(Self::TopRight),
            "bottom_left" => Ok(Self::BottomLeft),
            "bottom_right" => Ok(Self::BottomRight),
            other => Err(PixelPaneError::validation(format!(
                "unknown drag edge \"{other}\""
            ))),
        }
    }
}

/// Resize `proposed` to exactly `target`, moving the edges the user is dragging.
///
/// The opposite edges stay put, so the window does not jump while it snaps to whole canvas
/// pixels.
pub fn apply_trim(proposed: ClientRect, edge: DragEdge, target: Extent) -> ClientRect {
    let w = clamp_i32(target.width);
    let h = clamp_i32(target.height);
    let mut out = proposed;
    if edge.moves_left() {
        out.left = proposed.right.saturating_sub(w);
    } else {
        out.right = proposed.left.saturating_add(w);
    }
    if edge.moves_top() {
        out.top = proposed.bottom.saturating_sub(h);
    } else {
        out.bottom = proposed.top.saturating_add(h);
    }
    out
}
