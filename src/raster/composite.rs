//! Premultiplied RGBA8 blending used when presenting layers into a frame.

use crate::raster::pixel::Pixel;

/// One premultiplied RGBA8 texel.
pub type PremulRgba8 = [u8; 4];

/// Convert a straight-alpha pixel to premultiplied form.
pub fn premultiply(px: Pixel) -> PremulRgba8 {
    let a = px.alpha;
    [
        mul_div255(px.r, a),
        mul_div255(px.g, a),
        mul_div255(px.b, a),
        a,
    ]
}

/// Convert a premultiplied texel back to a straight-alpha pixel.
pub fn unpremultiply(c: PremulRgba8) -> Pixel {
    let a = c[3];
    if a == 0 {
        return Pixel::BLANK;
    }
    let un = |v: u8| -> u8 {
        let v = (u32::from(v) * 255 + u32::from(a) / 2) / u32::from(a);
        v.min(255) as u8
    };
    Pixel::new(un(c[0]), un(c[1]), un(c[2]), a)
}

/// Composite one layer texel over a frame texel.
///
/// The layer's draw `opacity` (clamped to `[0, 1]`, NaN treated as 0) is folded into the
/// premultiplied source first, then the result is blended with Porter-Duff source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let src = src.map(|c| mul_div255(c, opacity_u8(opacity)));
    if src[3] == 0 {
        return dst;
    }
    let keep = 0xFF - src[3];
    std::array::from_fn(|i| src[i].saturating_add(mul_div255(dst[i], keep)))
}

fn opacity_u8(opacity: f32) -> u8 {
    if opacity.is_nan() {
        return 0;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn mul_div255(x: u8, y: u8) -> u8 {
    ((u16::from(x) * u16::from(y) + 127) / 255) as u8
}
