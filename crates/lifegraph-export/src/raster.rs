//! Fixed-resolution RGB raster image and drawing primitives.
//!
//! [`RasterImage`] is the pixel surface everything renders onto: the
//! chart snapshot, event thumbnails, and the full off-screen layout. All
//! coordinate math is checked; drawing outside the surface clips rather
//! than panics.

use crate::error::ExportError;

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(
    /// Red channel.
    pub u8,
    /// Green channel.
    pub u8,
    /// Blue channel.
    pub u8,
);

/// Pure white, the fixed export background.
pub const WHITE: Rgb = Rgb(255, 255, 255);

/// Slate body-text color used across the document (`#334155`).
pub const SLATE: Rgb = Rgb(0x33, 0x41, 0x55);

/// Muted slate for secondary text (`#64748b`).
pub const SLATE_MUTED: Rgb = Rgb(0x64, 0x74, 0x8b);

/// Orange accent (`#f97316`), the chart stroke and title color.
pub const ORANGE: Rgb = Rgb(0xf9, 0x73, 0x16);

/// Red accent (`#ef4444`), the section heading color.
pub const RED: Rgb = Rgb(0xef, 0x44, 0x44);

/// Light slate for rules and grid lines (`#e2e8f0`).
pub const RULE: Rgb = Rgb(0xe2, 0xe8, 0xf0);

/// A fixed-size RGB8 pixel surface, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Allocate a surface filled with the given color.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::ArithmeticOverflow`] if the dimensions do
    /// not fit in memory arithmetic.
    pub fn new(width: u32, height: u32, fill: Rgb) -> Result<Self, ExportError> {
        let w = usize::try_from(width).map_err(|_| ExportError::ArithmeticOverflow)?;
        let h = usize::try_from(height).map_err(|_| ExportError::ArithmeticOverflow)?;
        let len = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(3))
            .ok_or(ExportError::ArithmeticOverflow)?;

        let mut pixels = vec![0_u8; len];
        for chunk in pixels.chunks_exact_mut(3) {
            chunk.copy_from_slice(&[fill.0, fill.1, fill.2]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing RGB8 buffer. The buffer length must be exactly
    /// `width * height * 3`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Rasterize`] on a length mismatch.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ExportError> {
        let expected = usize::try_from(width)
            .ok()
            .and_then(|w| usize::try_from(height).ok().map(|h| (w, h)))
            .and_then(|(w, h)| w.checked_mul(h))
            .and_then(|n| n.checked_mul(3))
            .ok_or(ExportError::ArithmeticOverflow)?;
        if pixels.len() != expected {
            return Err(ExportError::Rasterize(format!(
                "pixel buffer length {} does not match {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Surface width in pixels.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the surface has zero area.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The raw RGB8 pixel buffer, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Byte offset of the pixel at (x, y), if inside the surface.
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let w = usize::try_from(self.width).ok()?;
        let xi = usize::try_from(x).ok()?;
        let yi = usize::try_from(y).ok()?;
        yi.checked_mul(w)?.checked_add(xi)?.checked_mul(3)
    }

    /// Set one pixel. Out-of-bounds coordinates clip silently.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        if let Some(at) = self.index(x, y)
            && let Some(chunk) = self.pixels.get_mut(at..at.saturating_add(3))
        {
            chunk.copy_from_slice(&[color.0, color.1, color.2]);
        }
    }

    /// Read one pixel, or `None` outside the surface.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        let at = self.index(x, y)?;
        let chunk = self.pixels.get(at..at.checked_add(3)?)?;
        match chunk {
            [r, g, b] => Some(Rgb(*r, *g, *b)),
            _ => None,
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draw a straight line between two points (Bresenham), with the
    /// given stroke thickness. Endpoints may lie outside the surface.
    pub fn draw_line(&mut self, from: (i64, i64), to: (i64, i64), thickness: u32, color: Rgb) {
        let (x0, y0) = from;
        let (x1, y1) = to;
        let dx = (x1.saturating_sub(x0)).abs();
        let dy = -(y1.saturating_sub(y0)).abs();
        let sx: i64 = if x0 < x1 { 1 } else { -1 };
        let sy: i64 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx.saturating_add(dy);
        let mut x = x0;
        let mut y = y0;

        loop {
            self.plot_thick(x, y, thickness, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = err.saturating_mul(2);
            if e2 >= dy {
                err = err.saturating_add(dy);
                x = x.saturating_add(sx);
            }
            if e2 <= dx {
                err = err.saturating_add(dx);
                y = y.saturating_add(sy);
            }
        }
    }

    /// Plot a thickness x thickness block centered on (x, y), clipping
    /// anything outside the surface.
    fn plot_thick(&mut self, x: i64, y: i64, thickness: u32, color: Rgb) {
        let half = i64::from(thickness / 2);
        let span = i64::from(thickness.max(1));
        for oy in 0..span {
            for ox in 0..span {
                let px = x.saturating_add(ox).saturating_sub(half);
                let py = y.saturating_add(oy).saturating_sub(half);
                if let (Ok(ux), Ok(uy)) = (u32::try_from(px), u32::try_from(py)) {
                    self.set_pixel(ux, uy, color);
                }
            }
        }
    }

    /// Blit another surface onto this one at (x, y), scaled to
    /// `dest_w` x `dest_h` with nearest-neighbor sampling.
    pub fn blit_scaled(&mut self, src: &Self, x: u32, y: u32, dest_w: u32, dest_h: u32) {
        if src.is_empty() || dest_w == 0 || dest_h == 0 {
            return;
        }
        for dy in 0..dest_h {
            for dx in 0..dest_w {
                // Nearest-neighbor sample in u64 space; dimensions are
                // u32 so the products cannot overflow.
                let sx = u64::from(dx)
                    .saturating_mul(u64::from(src.width))
                    .checked_div(u64::from(dest_w))
                    .unwrap_or(0);
                let sy = u64::from(dy)
                    .saturating_mul(u64::from(src.height))
                    .checked_div(u64::from(dest_h))
                    .unwrap_or(0);
                if let (Ok(sx), Ok(sy)) = (u32::try_from(sx), u32::try_from(sy))
                    && let Some(color) = src.get_pixel(sx, sy)
                {
                    self.set_pixel(x.saturating_add(dx), y.saturating_add(dy), color);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_filled_with_the_background() {
        let img = RasterImage::new(3, 2, ORANGE).unwrap();
        assert_eq!(img.pixels().len(), 18);
        assert_eq!(img.get_pixel(2, 1), Some(ORANGE));
    }

    #[test]
    fn out_of_bounds_writes_clip_silently() {
        let mut img = RasterImage::new(2, 2, WHITE).unwrap();
        img.set_pixel(5, 5, RED);
        assert_eq!(img.get_pixel(5, 5), None);
        assert!(img.pixels().iter().all(|&b| b == 255));
    }

    #[test]
    fn fill_rect_clips_to_the_surface() {
        let mut img = RasterImage::new(4, 4, WHITE).unwrap();
        img.fill_rect(2, 2, 10, 10, SLATE);
        assert_eq!(img.get_pixel(3, 3), Some(SLATE));
        assert_eq!(img.get_pixel(1, 1), Some(WHITE));
    }

    #[test]
    fn from_pixels_rejects_length_mismatch() {
        let err = RasterImage::from_pixels(2, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }

    #[test]
    fn diagonal_line_touches_both_endpoints() {
        let mut img = RasterImage::new(10, 10, WHITE).unwrap();
        img.draw_line((0, 0), (9, 9), 1, ORANGE);
        assert_eq!(img.get_pixel(0, 0), Some(ORANGE));
        assert_eq!(img.get_pixel(9, 9), Some(ORANGE));
        assert_eq!(img.get_pixel(5, 5), Some(ORANGE));
    }

    #[test]
    fn blit_scaled_doubles_a_source() {
        let mut src = RasterImage::new(1, 1, RED).unwrap();
        src.set_pixel(0, 0, RED);
        let mut dst = RasterImage::new(4, 4, WHITE).unwrap();
        dst.blit_scaled(&src, 1, 1, 2, 2);
        assert_eq!(dst.get_pixel(1, 1), Some(RED));
        assert_eq!(dst.get_pixel(2, 2), Some(RED));
        assert_eq!(dst.get_pixel(3, 3), Some(WHITE));
    }
}
