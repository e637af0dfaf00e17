use crate::{
    foundation::core::Extent,
    render::backend::Viewport,
    resize::config::WindowState,
};

/// Place a `content`-sized canvas inside `area`.
///
/// Normal and maximized windows anchor the canvas at the top-left corner; since the viewport
/// y axis points up, that puts its bottom edge at `area.height - content.height`. Fullscreen
/// centers the canvas in the monitor, which `area` then describes.
pub fn place_viewport(state: WindowState, area: Extent, content: Extent) -> Viewport {
    let dx = i64::from(area.width) - i64::from(content.width);
    let dy = i64::from(area.height) - i64::from(content.height);
    let (x, y) = match state {
        WindowState::Normal | WindowState::Maximized => (0, dy),
        WindowState::Fullscreen => (dx / 2, dy / 2),
    };
    Viewport {
        x: saturate(x),
        y: saturate(y),
        width: content.width,
        height: content.height,
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
