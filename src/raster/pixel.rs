use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA8 color.
///
/// Alpha 0 is the blank pixel; alpha 255 is fully opaque. No invariant is enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub alpha: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const BLANK: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Construct from individual channels.
    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self { r, g, b, alpha }
    }

    /// Construct an opaque pixel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// Opaque pixel from `0xRRGGBB`; bits above 24 are ignored.
    pub const fn by_rgb(packed: u32) -> Self {
        Self::rgb((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }

    /// Pixel from `0xRRGGBBAA`.
    pub const fn by_rgba(packed: u32) -> Self {
        Self::new(
            (packed >> 24) as u8,
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
        )
    }

    /// Pixel from `0xAARRGGBB`.
    pub const fn by_argb(packed: u32) -> Self {
        Self::new(
            (packed >> 16) as u8,
            (packed >> 8) as u8,
            packed as u8,
            (packed >> 24) as u8,
        )
    }

    /// Pack as `0xRRGGBB`, dropping alpha.
    pub const fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Pack as `0xRRGGBBAA`.
    pub const fn to_rgba(self) -> u32 {
        (self.to_rgb() << 8) | self.alpha as u32
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        ((self.alpha as u32) << 24) | self.to_rgb()
    }

    /// `true` for alpha 255.
    pub const fn is_opaque(self) -> bool {
        self.alpha == 0xFF
    }

    /// Channels in `[r, g, b, a]` byte order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha]
    }

    /// Pixel from `[r, g, b, a]` bytes.
    pub const fn from_array(c: [u8; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

/// Draw `top` over `bottom`.
///
/// Not Porter-Duff "over": the bottom color is scaled by the top's transparency, the top color
/// is added unscaled, and both alphas are summed. Every channel saturates at 255.
pub fn composite_over(bottom: Pixel, top: Pixel) -> Pixel {
    if top.alpha == 0 {
        return bottom;
    }

    // single-precision visibility, widened
    let top_visible = f64::from(f32::from(top.alpha) / 255.0f32);
    let bottom_visible = 1.0 - top_visible;

    let channel = |b: u8, t: u8| -> u8 {
        let scaled = (bottom_visible * f64::from(b)).round() as u16;
        scaled.saturating_add(u16::from(t)).min(0xFF) as u8
    };

    Pixel {
        r: channel(bottom.r, top.r),
        g: channel(bottom.g, top.g),
        b: channel(bottom.b, top.b),
        alpha: bottom.alpha.saturating_add(top.alpha),
    }
}

impl Serialize for Pixel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("#{:08x}", self.to_rgba()))
    }
}

impl<'de> Deserialize<'de> for Pixel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque", alias = "a")]
                alpha: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            0xFF
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, alpha } => Ok(Pixel::new(r, g, b, alpha)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Pixel::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Pixel::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "pixel array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional, case-insensitive).
pub fn parse_hex(s: &str) -> Result<Pixel, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color \"{s}\""));
    }

    let packed = u32::from_str_radix(s, 16).map_err(|_| format!("invalid hex color \"{s}\""))?;
    match s.len() {
        6 => Ok(Pixel::by_rgb(packed)),
        8 => Ok(Pixel::by_rgba(packed)),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/pixel.rs"]
mod tests;
