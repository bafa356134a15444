//! Canvas - addressable pixel surface
//!
//! A [`Canvas`] is a non-owning view over a caller-supplied `&mut [u32]`
//! buffer. It exposes the three primitive operations every higher layer is
//! built from: axis-aligned rectangle fill, single-pixel writes, and
//! clipped bitmap composition for each of the bitmap variants.
//!
//! Every operation clips against the canvas bounds first; geometry that
//! ends up empty is a silent no-op, never an error. A canvas performs no
//! internal locking - one call assumes exclusive access to its buffer.

use anyhow::Result;

use crate::bitmap::{AlphaBitmap, OpaqueBitmap, PaletteBitmap};
use crate::color::{blend, PixelFormat};

/// Errors raised while constructing a canvas view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas dimensions {width}x{height} exceed {max}", max = crate::bitmap::MAX_DIMENSION)]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: u32, width: u32 },

    #[error("buffer holds {len} pixels, canvas needs {needed}")]
    BufferTooSmall { len: usize, needed: usize },
}

/// Destination rectangle after clipping, with the source offsets produced
/// by clipping at negative origins.
#[derive(Debug, Clone, Copy)]
struct Clip {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    ox: u32,
    oy: u32,
}

/// An addressable pixel surface over a caller-owned buffer.
pub struct Canvas<'a> {
    data: &'a mut [u32],
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
}

impl<'a> Canvas<'a> {
    /// Create a canvas in the process-native pixel format, `stride == width`.
    pub fn new(data: &'a mut [u32], width: u32, height: u32) -> Result<Self> {
        Self::with_format(data, width, height, width, PixelFormat::native())
    }

    /// Create a canvas addressing a sub-rectangle of a wider buffer.
    pub fn with_stride(data: &'a mut [u32], width: u32, height: u32, stride: u32) -> Result<Self> {
        Self::with_format(data, width, height, stride, PixelFormat::native())
    }

    /// Create a canvas with an explicit pixel format.
    pub fn with_format(
        data: &'a mut [u32],
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
    ) -> Result<Self> {
        if width > crate::bitmap::MAX_DIMENSION || height > crate::bitmap::MAX_DIMENSION {
            return Err(CanvasError::DimensionsTooLarge { width, height }.into());
        }
        if stride < width {
            return Err(CanvasError::StrideTooSmall { stride, width }.into());
        }
        if width > 0 && height > 0 {
            let needed = (height as usize - 1) * stride as usize + width as usize;
            if data.len() < needed {
                return Err(CanvasError::BufferTooSmall {
                    len: data.len(),
                    needed,
                }
                .into());
            }
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixels between the start of consecutive rows.
    #[must_use]
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// The pixel format this canvas packs and unpacks with.
    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Clip a `w`x`h` rectangle placed at `(x, y)` against the canvas.
    ///
    /// A negative origin shrinks the rectangle and yields the matching
    /// source offsets. Returns `None` when nothing remains visible.
    fn clip(&self, x: i32, y: i32, w: u32, h: u32) -> Option<Clip> {
        let mut w = w;
        let mut h = h;
        let mut ox = 0;
        let mut oy = 0;

        let x = if x < 0 {
            let shift = x.unsigned_abs();
            if shift > w {
                return None;
            }
            ox = shift;
            w -= shift;
            0
        } else {
            x as u32
        };

        let y = if y < 0 {
            let shift = y.unsigned_abs();
            if shift > h {
                return None;
            }
            oy = shift;
            h -= shift;
            0
        } else {
            y as u32
        };

        if x >= self.width || y >= self.height {
            return None;
        }

        w = w.min(self.width - x);
        h = h.min(self.height - y);

        if w == 0 || h == 0 {
            return None;
        }

        Some(Clip { x, y, w, h, ox, oy })
    }

    /// Fill a rectangle with `color`, blending by the color's alpha.
    ///
    /// Alpha 0 is a no-op, alpha 255 overwrites, anything between blends
    /// each channel against the existing pixels.
    pub fn rect(&mut self, color: u32, x: i32, y: i32, w: u32, h: u32) {
        let format = self.format;
        let (a, r, g, b) = format.unpack(color);

        let Some(c) = self.clip(x, y, w, h) else {
            return;
        };

        if a == 0 {
            return;
        }

        let stride = self.stride as usize;
        let start = c.y as usize * stride + c.x as usize;

        if a == 255 {
            for row in 0..c.h as usize {
                let off = start + row * stride;
                self.data[off..off + c.w as usize].fill(color);
            }
            return;
        }

        for row in 0..c.h as usize {
            let off = start + row * stride;
            for px in &mut self.data[off..off + c.w as usize] {
                let (_, ur, ug, ub) = format.unpack(*px);
                *px = format.pack_rgb(blend(a, r, ur), blend(a, g, ug), blend(a, b, ub));
            }
        }
    }

    /// Write one pixel; silently ignored out of bounds.
    pub fn put_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        self.data[y as usize * self.stride as usize + x as usize] = color;
    }

    /// Read one pixel; `None` out of bounds.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.stride as usize + x as usize])
    }

    /// Compose a bitmap with its top-left corner at `(x, y)`.
    ///
    /// Accepts any of the bitmap variants; each brings its own composition
    /// rule. The painted region is clipped to the canvas, and a mirrored
    /// bitmap is flipped horizontally while painting.
    pub fn paint<B: Blit>(&mut self, x: i32, y: i32, bmp: &B) {
        bmp.blit(self, x, y);
    }
}

/// Blend one source pixel onto a destination slot.
#[inline]
fn composite(format: PixelFormat, color: u32, dst: &mut u32) {
    let (a, r, g, b) = format.unpack(color);
    if a == 0 {
        return;
    }
    if a == 255 {
        *dst = color;
        return;
    }
    let (_, ur, ug, ub) = format.unpack(*dst);
    *dst = format.pack_rgb(blend(a, r, ur), blend(a, g, ug), blend(a, b, ub));
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for crate::bitmap::OpaqueBitmap<'_> {}
    impl Sealed for crate::bitmap::AlphaBitmap<'_> {}
    impl Sealed for crate::bitmap::PaletteBitmap<'_> {}
}

/// Composition rule of one bitmap variant. Implemented by the three bitmap
/// views; not implementable outside this crate.
pub trait Blit: sealed::Sealed {
    #[doc(hidden)]
    fn blit(&self, canvas: &mut Canvas<'_>, x: i32, y: i32);
}

impl Blit for OpaqueBitmap<'_> {
    fn blit(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let Some(c) = canvas.clip(x, y, self.width(), self.height()) else {
            return;
        };
        let src_stride = self.stride() as usize;
        let dst_stride = canvas.stride as usize;
        for row in 0..c.h as usize {
            let s = (c.oy as usize + row) * src_stride + c.ox as usize;
            let d = (c.y as usize + row) * dst_stride + c.x as usize;
            let src = &self.data[s..s + c.w as usize];
            let dst = &mut canvas.data[d..d + c.w as usize];
            if self.is_mirrored() {
                for (out, px) in dst.iter_mut().zip(src.iter().rev()) {
                    *out = *px;
                }
            } else {
                dst.copy_from_slice(src);
            }
        }
    }
}

impl Blit for AlphaBitmap<'_> {
    fn blit(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let Some(c) = canvas.clip(x, y, self.width(), self.height()) else {
            return;
        };
        let format = canvas.format;
        let src_stride = self.stride() as usize;
        let dst_stride = canvas.stride as usize;
        for row in 0..c.h as usize {
            let s = (c.oy as usize + row) * src_stride + c.ox as usize;
            let d = (c.y as usize + row) * dst_stride + c.x as usize;
            let src = &self.data[s..s + c.w as usize];
            let dst = &mut canvas.data[d..d + c.w as usize];
            if self.is_mirrored() {
                for (out, px) in dst.iter_mut().zip(src.iter().rev()) {
                    composite(format, *px, out);
                }
            } else {
                for (out, px) in dst.iter_mut().zip(src.iter()) {
                    composite(format, *px, out);
                }
            }
        }
    }
}

impl Blit for PaletteBitmap<'_> {
    fn blit(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let Some(c) = canvas.clip(x, y, self.width(), self.height()) else {
            return;
        };
        let format = canvas.format;
        let src_stride = self.stride() as usize;
        let dst_stride = canvas.stride as usize;
        for row in 0..c.h as usize {
            let s = (c.oy as usize + row) * src_stride + c.ox as usize;
            let d = (c.y as usize + row) * dst_stride + c.x as usize;
            let src = &self.data[s..s + c.w as usize];
            let dst = &mut canvas.data[d..d + c.w as usize];
            if self.is_mirrored() {
                for (out, idx) in dst.iter_mut().zip(src.iter().rev()) {
                    composite(format, self.palette[*idx as usize], out);
                }
            } else {
                for (out, idx) in dst.iter_mut().zip(src.iter()) {
                    composite(format, self.palette[*idx as usize], out);
                }
            }
        }
    }
}
