//! Bitmap views
//!
//! Three non-owning views over caller-supplied pixel data, one per
//! composition rule:
//!
//! - [`OpaqueBitmap`] — 32-bit pixels, copied over the destination as-is.
//! - [`AlphaBitmap`] — 32-bit pixels blended by their own alpha channel.
//! - [`PaletteBitmap`] — 8-bit indices resolved through a 256-entry color
//!   table, then blended like an alpha bitmap.
//!
//! A view never owns pixel memory; the referenced buffer must outlive it.
//! Horizontal mirroring is requested with an explicit flag on the view
//! rather than encoded into the dimensions.

use anyhow::Result;

/// Largest accepted width or height for any bitmap view.
pub const MAX_DIMENSION: u32 = 1 << 15;

/// Errors raised while constructing a bitmap view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BitmapError {
    #[error("bitmap dimensions {width}x{height} exceed {MAX_DIMENSION}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("stride {stride} is smaller than width {width}")]
    StrideTooSmall { stride: u32, width: u32 },

    #[error("buffer holds {len} elements, view needs {needed}")]
    BufferTooSmall { len: usize, needed: usize },
}

fn check_geometry(width: u32, height: u32, stride: u32, len: usize) -> Result<(), BitmapError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(BitmapError::DimensionsTooLarge { width, height });
    }
    if stride < width {
        return Err(BitmapError::StrideTooSmall { stride, width });
    }
    if width > 0 && height > 0 {
        let needed = (height as usize - 1) * stride as usize + width as usize;
        if len < needed {
            return Err(BitmapError::BufferTooSmall { len, needed });
        }
    }
    Ok(())
}

macro_rules! view_accessors {
    () => {
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

        /// Whether paint flips this bitmap horizontally.
        #[must_use]
        pub const fn is_mirrored(&self) -> bool {
            self.mirrored
        }

        /// Request a horizontal flip during paint.
        #[must_use]
        pub fn mirrored(mut self) -> Self {
            self.mirrored = true;
            self
        }
    };
}

// ============================================================================
// OpaqueBitmap
// ============================================================================

/// A 32-bit bitmap painted without blending.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueBitmap<'a> {
    pub(crate) data: &'a [u32],
    width: u32,
    height: u32,
    stride: u32,
    mirrored: bool,
}

impl<'a> OpaqueBitmap<'a> {
    /// Create a view with `stride == width`.
    pub fn new(data: &'a [u32], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    /// Create a view addressing a sub-rectangle of a wider buffer.
    pub fn with_stride(data: &'a [u32], width: u32, height: u32, stride: u32) -> Result<Self> {
        check_geometry(width, height, stride, data.len())?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            mirrored: false,
        })
    }

    view_accessors!();
}

// ============================================================================
// AlphaBitmap
// ============================================================================

/// A 32-bit bitmap blended by its per-pixel alpha channel.
#[derive(Debug, Clone, Copy)]
pub struct AlphaBitmap<'a> {
    pub(crate) data: &'a [u32],
    width: u32,
    height: u32,
    stride: u32,
    mirrored: bool,
}

impl<'a> AlphaBitmap<'a> {
    /// Create a view with `stride == width`.
    pub fn new(data: &'a [u32], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    /// Create a view addressing a sub-rectangle of a wider buffer.
    pub fn with_stride(data: &'a [u32], width: u32, height: u32, stride: u32) -> Result<Self> {
        check_geometry(width, height, stride, data.len())?;
        Ok(Self {
            data,
            width,
            height,
            stride,
            mirrored: false,
        })
    }

    view_accessors!();
}

// ============================================================================
// PaletteBitmap
// ============================================================================

/// An 8-bit indexed bitmap resolved through a 256-entry color table.
///
/// Each source byte selects a palette entry; the entry's alpha drives the
/// same blend as [`AlphaBitmap`]. Storing coverage in the palette index is
/// how single-color raster text gets anti-aliased edges.
#[derive(Debug, Clone, Copy)]
pub struct PaletteBitmap<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) palette: &'a [u32; 256],
    width: u32,
    height: u32,
    stride: u32,
    mirrored: bool,
}

impl<'a> PaletteBitmap<'a> {
    /// Create a view with `stride == width`.
    pub fn new(data: &'a [u8], palette: &'a [u32; 256], width: u32, height: u32) -> Result<Self> {
        Self::with_stride(data, palette, width, height, width)
    }

    /// Create a view addressing a sub-rectangle of a wider buffer.
    pub fn with_stride(
        data: &'a [u8],
        palette: &'a [u32; 256],
        width: u32,
        height: u32,
        stride: u32,
    ) -> Result<Self> {
        check_geometry(width, height, stride, data.len())?;
        Ok(Self {
            data,
            palette,
            width,
            height,
            stride,
            mirrored: false,
        })
    }

    view_accessors!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_defaults_to_width() {
        let data = vec![0u32; 12];
        let bmp = OpaqueBitmap::new(&data, 4, 3).unwrap();
        assert_eq!(bmp.width(), 4);
        assert_eq!(bmp.height(), 3);
        assert_eq!(bmp.stride(), 4);
        assert!(!bmp.is_mirrored());
    }

    #[test]
    fn test_mirrored_flag() {
        let data = vec![0u32; 4];
        let bmp = AlphaBitmap::new(&data, 2, 2).unwrap().mirrored();
        assert!(bmp.is_mirrored());
    }

    #[test]
    fn test_sub_rectangle_coverage() {
        // 2x2 view into a 4-wide buffer: needs 1*4 + 2 = 6 elements.
        let data = vec![0u32; 6];
        assert!(OpaqueBitmap::with_stride(&data, 2, 2, 4).is_ok());
        let short = vec![0u32; 5];
        assert!(OpaqueBitmap::with_stride(&short, 2, 2, 4).is_err());
    }

    #[test]
    fn test_rejects_undersized_buffer() {
        let data = vec![0u32; 3];
        let err = OpaqueBitmap::new(&data, 2, 2)
            .unwrap_err()
            .downcast::<BitmapError>()
            .unwrap();
        assert_eq!(err, BitmapError::BufferTooSmall { len: 3, needed: 4 });
    }

    #[test]
    fn test_rejects_small_stride() {
        let data = vec![0u32; 16];
        assert!(OpaqueBitmap::with_stride(&data, 4, 2, 3).is_err());
    }

    #[test]
    fn test_rejects_oversized_dimensions() {
        let data = vec![0u32; 1];
        assert!(AlphaBitmap::new(&data, MAX_DIMENSION + 1, 1).is_err());
    }

    #[test]
    fn test_zero_size_needs_no_data() {
        let data: Vec<u32> = Vec::new();
        assert!(OpaqueBitmap::new(&data, 0, 0).is_ok());
        assert!(OpaqueBitmap::new(&data, 4, 0).is_ok());
    }

    #[test]
    fn test_palette_bitmap() {
        let data = vec![0u8; 9];
        let palette = [0u32; 256];
        let bmp = PaletteBitmap::new(&data, &palette, 3, 3).unwrap();
        assert_eq!(bmp.width(), 3);
        assert_eq!(bmp.stride(), 3);
    }
}
