//! Pixel packing and channel arithmetic
//!
//! All surfaces in this crate hold 32-bit pixels whose A/R/G/B byte
//! arrangement depends on the host's native image format. Exactly two
//! arrangements exist in the wild for our hosts: BGRA-native (alpha in the
//! top byte, red in bits 16..24) and RGBA-native (same, with red and blue
//! swapped). Every packer and unpacker takes the format explicitly; a
//! compositing path picks one format up front and uses it throughout.

use std::sync::OnceLock;

/// Native 32-bit pixel byte arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Alpha, red, green, blue from the top byte down (little-endian BGRA).
    Bgra,
    /// Alpha, blue, green, red from the top byte down (little-endian RGBA).
    Rgba,
}

static NATIVE_FORMAT: OnceLock<PixelFormat> = OnceLock::new();

impl PixelFormat {
    /// The process-wide native format.
    ///
    /// The host queries its imaging system once at startup and records the
    /// answer with [`PixelFormat::set_native`]; the value cannot change for
    /// the lifetime of the process. Defaults to [`PixelFormat::Bgra`] when
    /// never set.
    #[must_use]
    pub fn native() -> PixelFormat {
        *NATIVE_FORMAT.get_or_init(|| PixelFormat::Bgra)
    }

    /// Record the process-native format.
    ///
    /// Returns `false` if the format was already fixed (by a previous call
    /// or by a [`PixelFormat::native`] query) to a different value.
    pub fn set_native(format: PixelFormat) -> bool {
        *NATIVE_FORMAT.get_or_init(|| format) == format
    }

    /// Pack four channels into a 32-bit pixel in this format's arrangement.
    #[inline]
    #[must_use]
    pub fn pack(self, a: u8, r: u8, g: u8, b: u8) -> u32 {
        match self {
            PixelFormat::Bgra => {
                (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
            }
            PixelFormat::Rgba => {
                (u32::from(a) << 24) | (u32::from(b) << 16) | (u32::from(g) << 8) | u32::from(r)
            }
        }
    }

    /// Pack an opaque pixel (alpha 255).
    #[inline]
    #[must_use]
    pub fn pack_rgb(self, r: u8, g: u8, b: u8) -> u32 {
        self.pack(0xFF, r, g, b)
    }

    /// Unpack a 32-bit pixel into `(a, r, g, b)`.
    #[inline]
    #[must_use]
    pub fn unpack(self, pixel: u32) -> (u8, u8, u8, u8) {
        let a = (pixel >> 24) as u8;
        let x = (pixel >> 16) as u8;
        let g = (pixel >> 8) as u8;
        let y = pixel as u8;
        match self {
            PixelFormat::Bgra => (a, x, g, y),
            PixelFormat::Rgba => (a, y, g, x),
        }
    }
}

/// Saturate an integer to the byte range.
#[inline]
#[must_use]
pub fn clamp_u8(i: i32) -> u8 {
    if i < 0 {
        0
    } else if i > 255 {
        255
    } else {
        i as u8
    }
}

/// Blend one channel of `over` onto `under` with the given coverage.
///
/// `blend(255, over, _) == over` and `blend(0, _, under) == under`; the
/// division truncates.
#[inline]
#[must_use]
pub fn blend(alpha: u8, over: u8, under: u8) -> u8 {
    let alpha = i32::from(alpha);
    let over = i32::from(over);
    let under = i32::from(under);
    clamp_u8((over * alpha + under * (255 - alpha)) / 255)
}
