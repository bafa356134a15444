//! Software 2D compositing core
//!
//! Renders filled rectangles, bitmaps (opaque, per-pixel-alpha, and
//! palette-indexed), raster text, and planar YUV420 video frames into
//! caller-owned pixel buffers, with no display-server dependency. The
//! embedding layer owns every buffer and every host resource; this crate
//! only composites.
//!
//! Typical flow: wrap a buffer in a [`Canvas`], obtain a [`Font`]
//! (builtin or through a [`FontCache`]), and paint. Video frames convert
//! through [`Yuv420Frame`] straight into an RGB buffer.

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod font;
pub mod utf8;
pub mod yuv;

pub use bitmap::{AlphaBitmap, BitmapError, OpaqueBitmap, PaletteBitmap, MAX_DIMENSION};
pub use canvas::{Blit, Canvas, CanvasError};
pub use color::{blend, clamp_u8, PixelFormat};
pub use font::{
    BuiltinFont, Font, FontCache, FontSpec, FontSource, Glyph, HostFont, HostMetrics, RasterGlyph,
    SystemFont,
};
pub use yuv::{ClusterRow, ClusterRows, Yuv420Frame, YuvError};
