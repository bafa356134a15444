//! Host-rasterized fonts
//!
//! The engine never talks to an OS text API directly. A host implements
//! [`FontSource`] (open a font resource for a family/size/style) and
//! [`HostFont`] (report metrics, rasterize one codepoint to an 8-bit
//! coverage pixmap). [`FontHandle`] wraps one opened host font together
//! with a bounded cache of rasterized [`Glyph`]s; [`SystemFont`] layers
//! the text layout of the [`Font`](crate::font::Font) capability set on
//! top of a shared handle.
//!
//! Rasterization failures are cached too: a codepoint the host cannot
//! render (whitespace, missing glyph) is stored with `loaded = false` so
//! the host is asked exactly once per codepoint.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::bitmap::PaletteBitmap;
use crate::canvas::Canvas;
use crate::font::{alpha_palette, Font};
use crate::utf8::Codepoints;

/// Key identifying one host font resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size: u32, bold: bool, italic: bool) -> Self {
        Self {
            family: family.into(),
            size,
            bold,
            italic,
        }
    }
}

/// Vertical metrics reported by the host for an opened font.
#[derive(Debug, Clone, Copy)]
pub struct HostMetrics {
    pub height: u32,
    pub ascent: u32,
    pub descent: u32,
    /// Extra interline spacing between consecutive lines.
    pub leading: u32,
}

/// One rasterized glyph as returned by the host.
#[derive(Debug, Clone)]
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    /// Horizontal pen increment after this glyph.
    pub advance: i32,
    /// Pen-to-bitmap-origin offsets; paint places the bitmap's top-left
    /// at `(pen_x - offset_x, baseline_y - offset_y)`.
    pub offset_x: i32,
    pub offset_y: i32,
    /// 8-bit coverage, `width * height` bytes, row-major.
    pub pixmap: Vec<u8>,
}

/// Host rasterizer contract: metrics and per-codepoint glyph bitmaps.
pub trait HostFont: Send + Sync {
    fn metrics(&self) -> HostMetrics;

    /// Pen advance for the space character.
    fn space_advance(&self) -> i32;

    /// Rasterize one codepoint; `None` when the host has no outline.
    fn rasterize(&self, codepoint: u32) -> Option<RasterGlyph>;
}

/// Host font-resource contract: open a font for a spec.
pub trait FontSource: Send + Sync {
    fn open(&self, spec: &FontSpec) -> Option<Box<dyn HostFont>>;
}

/// A cached glyph. `loaded == false` records a failed rasterization.
#[derive(Debug)]
pub struct Glyph {
    pub codepoint: u32,
    pub advance: i32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub pixmap: Vec<u8>,
    pub loaded: bool,
}

impl Glyph {
    fn unloaded(codepoint: u32) -> Self {
        Self {
            codepoint,
            advance: 0,
            width: 0,
            height: 0,
            offset_x: 0,
            offset_y: 0,
            pixmap: Vec::new(),
            loaded: false,
        }
    }
}

/// One opened host font plus its private bounded glyph cache.
///
/// Handles are shared by `Arc`: every [`SystemFont`] for the same
/// [`FontSpec`] holds the same handle, and a handle evicted from the
/// font cache stays valid for anyone still holding it.
pub struct FontHandle {
    spec: FontSpec,
    metrics: HostMetrics,
    space_advance: i32,
    host: Box<dyn HostFont>,
    glyphs: Mutex<LruCache<u32, Arc<Glyph>>>,
}

impl FontHandle {
    pub(crate) fn new(spec: FontSpec, host: Box<dyn HostFont>, glyph_capacity: usize) -> Self {
        let metrics = host.metrics();
        let space_advance = host.space_advance();
        let capacity = NonZeroUsize::new(glyph_capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            spec,
            metrics,
            space_advance,
            host,
            glyphs: Mutex::new(LruCache::new(capacity)),
        }
    }

    #[must_use]
    pub fn spec(&self) -> &FontSpec {
        &self.spec
    }

    #[must_use]
    pub fn metrics(&self) -> HostMetrics {
        self.metrics
    }

    #[must_use]
    pub fn space_advance(&self) -> i32 {
        self.space_advance
    }

    /// Number of glyphs currently cached.
    #[must_use]
    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.lock().len()
    }

    /// Look up a glyph, rasterizing on miss. Failed rasterizations are
    /// cached as unloaded glyphs and never retried.
    pub fn glyph(&self, codepoint: u32) -> Arc<Glyph> {
        let mut cache = self.glyphs.lock();
        if let Some(glyph) = cache.get(&codepoint) {
            return Arc::clone(glyph);
        }

        let glyph = match self.host.rasterize(codepoint) {
            Some(raster) if raster.pixmap.len() >= (raster.width * raster.height) as usize => {
                Arc::new(Glyph {
                    codepoint,
                    advance: raster.advance,
                    width: raster.width,
                    height: raster.height,
                    offset_x: raster.offset_x,
                    offset_y: raster.offset_y,
                    pixmap: raster.pixmap,
                    loaded: true,
                })
            }
            Some(_) => {
                log::warn!(
                    "host returned undersized pixmap for U+{codepoint:04X} in '{}'",
                    self.spec.family
                );
                Arc::new(Glyph::unloaded(codepoint))
            }
            None => {
                log::debug!(
                    "rasterization failed for U+{codepoint:04X} in '{}'",
                    self.spec.family
                );
                Arc::new(Glyph::unloaded(codepoint))
            }
        };
        cache.push(codepoint, Arc::clone(&glyph));
        glyph
    }

    /// Pen advance for one codepoint (0 for unloaded glyphs).
    pub fn advance(&self, codepoint: u32) -> i32 {
        self.glyph(codepoint).advance
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("spec", &self.spec)
            .field("cached_glyphs", &self.cached_glyphs())
            .finish_non_exhaustive()
    }
}

/// Text split into lines (at `'\n'`) of words (at `' '`), decoded to
/// scalar values. Every line holds at least one (possibly empty) word.
fn split_lines(text: &str) -> Vec<Vec<Vec<u32>>> {
    let mut lines = Vec::new();
    let mut line = Vec::new();
    let mut word = Vec::new();
    for cp in Codepoints::new(text.as_bytes()) {
        match cp {
            0x20 => line.push(std::mem::take(&mut word)),
            0x0A => {
                line.push(std::mem::take(&mut word));
                lines.push(std::mem::take(&mut line));
            }
            _ => word.push(cp),
        }
    }
    line.push(word);
    lines.push(line);
    lines
}

/// A host-backed font sharing one [`FontHandle`].
#[derive(Debug, Clone)]
pub struct SystemFont {
    handle: Arc<FontHandle>,
}

impl SystemFont {
    #[must_use]
    pub fn new(handle: Arc<FontHandle>) -> Self {
        Self { handle }
    }

    /// The shared handle behind this font.
    #[must_use]
    pub fn handle(&self) -> &Arc<FontHandle> {
        &self.handle
    }
}

impl Font for SystemFont {
    fn height(&self) -> u32 {
        self.handle.metrics.height
    }

    fn ascent(&self) -> u32 {
        self.handle.metrics.ascent
    }

    fn descent(&self) -> u32 {
        self.handle.metrics.descent
    }

    fn line_height(&self) -> u32 {
        self.handle.metrics.height + self.handle.metrics.leading
    }

    fn paint(&self, text: &str, x: i32, y: i32, color: u32, canvas: &mut Canvas<'_>) {
        let palette = alpha_palette(color);
        let left = x;
        let mut x = x;
        let mut y = y + self.handle.metrics.ascent as i32;

        for line in split_lines(text) {
            for word in line {
                for cp in word {
                    let glyph = self.handle.glyph(cp);
                    if glyph.loaded && glyph.width > 0 && glyph.height > 0 {
                        if let Ok(bmp) =
                            PaletteBitmap::new(&glyph.pixmap, &palette, glyph.width, glyph.height)
                        {
                            canvas.paint(x - glyph.offset_x, y - glyph.offset_y, &bmp);
                        }
                    }
                    x += glyph.advance;
                }
                x += self.handle.space_advance;
            }
            y += self.line_height() as i32;
            x = left;
        }
    }

    fn measure(&self, text: &str) -> (u32, u32) {
        let space = self.handle.space_advance;
        let mut width = 0i32;
        let mut lines = 0u32;

        for line in split_lines(text) {
            lines += 1;
            let mut length = 0i32;
            for word in &line {
                for &cp in word {
                    length += self.handle.advance(cp);
                }
                length += space;
            }
            // The pen motion after the last word draws nothing.
            length -= space;
            width = width.max(length);
        }

        let m = self.handle.metrics;
        (
            width.max(0) as u32,
            lines * m.height + lines.saturating_sub(1) * m.leading,
        )
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic host implementations for tests.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Codepoint the mock host always fails to rasterize.
    pub const UNRENDERABLE: u32 = 0x2603;

    /// Square-glyph host: every codepoint rasterizes to a fully covered
    /// 4x4 block sitting on the baseline, advance 5, space advance 3.
    pub struct SquareHost {
        pub calls: Arc<AtomicUsize>,
    }

    impl SquareHost {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    pub const SQUARE_METRICS: HostMetrics = HostMetrics {
        height: 10,
        ascent: 8,
        descent: 2,
        leading: 1,
    };

    impl HostFont for SquareHost {
        fn metrics(&self) -> HostMetrics {
            SQUARE_METRICS
        }

        fn space_advance(&self) -> i32 {
            3
        }

        fn rasterize(&self, codepoint: u32) -> Option<RasterGlyph> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if codepoint == UNRENDERABLE {
                return None;
            }
            Some(RasterGlyph {
                width: 4,
                height: 4,
                advance: 5,
                offset_x: 0,
                offset_y: 4,
                pixmap: vec![0xFF; 16],
            })
        }
    }

    /// FontSource handing out [`SquareHost`]s and counting opens.
    pub struct SquareSource {
        pub opens: Arc<AtomicUsize>,
    }

    impl SquareSource {
        pub fn new() -> Self {
            Self {
                opens: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl FontSource for SquareSource {
        fn open(&self, _spec: &FontSpec) -> Option<Box<dyn HostFont>> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            Some(Box::new(SquareHost::new()))
        }
    }
}
