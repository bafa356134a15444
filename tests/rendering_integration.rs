//! End-to-end smoke tests for the compositing stack: canvas fills, bitmap
//! composition, both font paths, and YUV frame conversion, all against
//! plain in-memory buffers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use softgfx::{
    AlphaBitmap, BuiltinFont, Canvas, Font, FontCache, FontSpec, FontSource, HostFont,
    HostMetrics, PixelFormat, RasterGlyph, Yuv420Frame,
};

const FMT: PixelFormat = PixelFormat::Bgra;

/// Host stub: every codepoint is a filled `size x size` square sitting on
/// the baseline; whitespace never rasterizes.
struct StubHost {
    size: u32,
    rasterized: Arc<AtomicUsize>,
}

impl HostFont for StubHost {
    fn metrics(&self) -> HostMetrics {
        HostMetrics {
            height: self.size + 2,
            ascent: self.size,
            descent: 2,
            leading: 1,
        }
    }

    fn space_advance(&self) -> i32 {
        self.size as i32 / 2
    }

    fn rasterize(&self, codepoint: u32) -> Option<RasterGlyph> {
        self.rasterized.fetch_add(1, Ordering::SeqCst);
        if char::from_u32(codepoint).is_some_and(char::is_whitespace) {
            return None;
        }
        Some(RasterGlyph {
            width: self.size,
            height: self.size,
            advance: self.size as i32 + 1,
            offset_x: 0,
            offset_y: self.size as i32,
            pixmap: vec![0xFF; (self.size * self.size) as usize],
        })
    }
}

struct StubSource {
    rasterized: Arc<AtomicUsize>,
}

impl FontSource for StubSource {
    fn open(&self, spec: &FontSpec) -> Option<Box<dyn HostFont>> {
        Some(Box::new(StubHost {
            size: spec.size,
            rasterized: Arc::clone(&self.rasterized),
        }))
    }
}

fn stub_cache() -> (FontCache, Arc<AtomicUsize>) {
    let rasterized = Arc::new(AtomicUsize::new(0));
    let cache = FontCache::new(Box::new(StubSource {
        rasterized: Arc::clone(&rasterized),
    }));
    (cache, rasterized)
}

#[test]
fn rect_then_bitmap_then_text_compose_in_order() {
    let mut buf = vec![0u32; 64 * 32];
    let mut canvas = Canvas::with_format(&mut buf, 64, 32, 64, FMT).unwrap();

    // Background fill.
    let bg = FMT.pack_rgb(10, 10, 40);
    canvas.rect(bg, 0, 0, 64, 32);

    // Semi-transparent overlay strip.
    canvas.rect(FMT.pack(128, 255, 255, 255), 0, 0, 64, 8);
    let strip = canvas.pixel(5, 5).unwrap();
    assert_ne!(strip, bg);

    // An alpha bitmap stamped over the strip.
    let stamp = vec![FMT.pack(255, 200, 0, 0); 4];
    let bmp = AlphaBitmap::new(&stamp, 2, 2).unwrap();
    canvas.paint(1, 1, &bmp);
    assert_eq!(canvas.pixel(1, 1), Some(FMT.pack(255, 200, 0, 0)));

    // Text lands on top of everything.
    BuiltinFont::new().paint("ok", 20, 10, 0x00FFFFFF, &mut canvas);
    let white = FMT.pack_rgb(255, 255, 255);
    assert!(buf.iter().any(|&px| px == white));
}

#[test]
fn builtin_text_fits_measured_box() {
    let font = BuiltinFont::new();
    let text = "two\nlines";
    let (w, h) = font.measure(text);
    assert!(w > 0 && h > 0);

    let mut buf = vec![0u32; 128 * 64];
    {
        let mut canvas = Canvas::with_format(&mut buf, 128, 64, 128, FMT).unwrap();
        font.paint(text, 0, 0, 0x00FFFFFF, &mut canvas);
    }
    for (i, &px) in buf.iter().enumerate() {
        if px != 0 {
            let (x, y) = ((i % 128) as u32, (i / 128) as u32);
            assert!(x < w && y < h, "pixel ({x},{y}) outside measured {w}x{h}");
        }
    }
}

#[test]
fn system_font_full_path_through_cache() {
    let (cache, rasterized) = stub_cache();
    let font = cache.load(&FontSpec::new("Stub Sans", 8, false, false)).unwrap();

    let text = "hi there";
    let (w, h) = font.measure(text);
    // 7 glyphs at advance 9, one joining space advance 4.
    assert_eq!(w, 7 * 9 + 4);
    assert_eq!(h, 10);

    let mut buf = vec![0u32; 128 * 32];
    {
        let mut canvas = Canvas::with_format(&mut buf, 128, 32, 128, FMT).unwrap();
        font.paint(text, 0, 0, 0x0000FF00, &mut canvas);
    }
    let green = FMT.pack(255, 0, 255, 0);
    assert!(buf.iter().any(|&px| px == green));

    // Painting again rasterizes nothing new: every glyph is cached.
    let before = rasterized.load(Ordering::SeqCst);
    let mut buf2 = vec![0u32; 128 * 32];
    {
        let mut canvas = Canvas::with_format(&mut buf2, 128, 32, 128, FMT).unwrap();
        font.paint(text, 0, 0, 0x0000FF00, &mut canvas);
    }
    assert_eq!(rasterized.load(Ordering::SeqCst), before);
    assert_eq!(buf, buf2);
}

#[test]
fn same_spec_loads_share_glyph_cache() {
    let (cache, rasterized) = stub_cache();
    let spec = FontSpec::new("Stub Sans", 8, false, false);

    let a = cache.load(&spec).unwrap();
    let mut buf = vec![0u32; 64 * 16];
    {
        let mut canvas = Canvas::with_format(&mut buf, 64, 16, 64, FMT).unwrap();
        a.paint("abc", 0, 0, 0x00FFFFFF, &mut canvas);
    }
    let after_first = rasterized.load(Ordering::SeqCst);

    // A second load of the same spec reuses the rasterized glyphs.
    let b = cache.load(&spec).unwrap();
    assert_eq!(b.measure("abc"), a.measure("abc"));
    assert_eq!(rasterized.load(Ordering::SeqCst), after_first);
}

#[test]
fn yuv_frame_into_canvas_buffer() {
    // 4x2 frame, all-white luma/chroma.
    let w = 4u32;
    let h = 2u32;
    let mut data = vec![235u8; (w * h) as usize];
    data.extend(vec![128u8; 2 * (w as usize / 2) * (h as usize / 2)]);

    let frame = Yuv420Frame::new(w, h, &data).unwrap();
    let mut out = vec![0u32; (w * h) as usize];
    frame.convert_into(FMT, &mut out);

    for &px in &out {
        let (a, r, g, b) = FMT.unpack(px);
        assert_eq!(a, 255);
        assert!(r >= 254 && g >= 254 && b >= 254);
    }

    // The converted buffer is a valid canvas for further compositing.
    let mut canvas = Canvas::with_format(&mut out, w, h, w, FMT).unwrap();
    canvas.rect(FMT.pack_rgb(0, 0, 0), 0, 0, 1, 1);
    assert_eq!(canvas.pixel(0, 0), Some(FMT.pack_rgb(0, 0, 0)));
    assert!(canvas.pixel(1, 0).unwrap() >= FMT.pack_rgb(254, 254, 254));
}

#[test]
fn clipped_text_never_writes_out_of_bounds() {
    // 10x10 canvas windowed inside a 20-wide guard buffer.
    let mut buf = vec![0x77u32; 20 * 12];
    {
        let mut canvas = Canvas::with_format(&mut buf, 10, 10, 20, FMT).unwrap();
        let font = BuiltinFont::new();
        font.paint("clip me hard\nsecond line", -6, -5, 0x00FFFFFF, &mut canvas);
        let (cache, _) = stub_cache();
        let sys = cache.load(&FontSpec::new("Stub", 8, false, false)).unwrap();
        sys.paint("clipped too", -3, 6, 0x00FF0000, &mut canvas);
    }
    for y in 0..12 {
        for x in 0..20 {
            if x >= 10 || y >= 10 {
                assert_eq!(buf[y * 20 + x], 0x77, "guard pixel ({x},{y}) clobbered");
            }
        }
    }
}
