//! Slicing one tall raster across A4 pages.
//!
//! The raster is scaled to the full page width; its scaled height then
//! determines the page count. Every page draws the *same* image, shifted
//! up by one page height per page, so page boundaries cut the document
//! wherever they fall. Millimeter math uses [`Decimal`] so repeated
//! offsets accumulate no float drift.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::ExportError;

/// A4 portrait width in millimeters.
pub const A4_WIDTH_MM: Decimal = Decimal::from_parts(210, 0, 0, false, 0);
/// A4 portrait height in millimeters.
pub const A4_HEIGHT_MM: Decimal = Decimal::from_parts(297, 0, 0, false, 0);

/// Where the shared document image sits on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlacement {
    /// Zero-based page index.
    pub index: u32,
    /// Vertical offset of the image's top edge, in mm. Zero on the
    /// first page, then one page height further up per page.
    pub y_offset_mm: Decimal,
}

/// The full pagination of one rasterized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPlan {
    /// Image width on every page; always the full page width.
    pub image_width_mm: Decimal,
    /// Image height after scaling to the page width.
    pub image_height_mm: Decimal,
    /// One placement per page, in page order.
    pub pages: Vec<PagePlacement>,
}

impl PaginationPlan {
    /// Number of pages in the plan.
    pub fn page_count(&self) -> u32 {
        u32::try_from(self.pages.len()).unwrap_or(u32::MAX)
    }
}

/// Plan the page layout for a raster of the given pixel dimensions.
///
/// A raster no taller than one page yields exactly one page; an exact
/// multiple of the page height yields exactly that many pages, never a
/// trailing blank one.
pub fn paginate(raster_width: u32, raster_height: u32) -> Result<PaginationPlan, ExportError> {
    if raster_width == 0 || raster_height == 0 {
        return Err(ExportError::Pagination(format!(
            "cannot paginate an empty raster ({raster_width}x{raster_height})"
        )));
    }

    let width = Decimal::from(raster_width);
    let height = Decimal::from(raster_height);
    let image_height_mm = A4_WIDTH_MM
        .checked_mul(height)
        .and_then(|scaled| scaled.checked_div(width))
        .ok_or(ExportError::ArithmeticOverflow)?;

    let page_count = image_height_mm
        .checked_div(A4_HEIGHT_MM)
        .ok_or(ExportError::ArithmeticOverflow)?
        .ceil()
        .to_u32()
        .ok_or(ExportError::ArithmeticOverflow)?
        .max(1);

    let mut pages = Vec::with_capacity(usize::try_from(page_count).unwrap_or(0));
    let mut y_offset_mm = Decimal::ZERO;
    for index in 0..page_count {
        pages.push(PagePlacement { index, y_offset_mm });
        y_offset_mm = y_offset_mm
            .checked_sub(A4_HEIGHT_MM)
            .ok_or(ExportError::ArithmeticOverflow)?;
    }

    Ok(PaginationPlan {
        image_width_mm: A4_WIDTH_MM,
        image_height_mm,
        pages,
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn short_document_fits_one_page() {
        // 840 px wide maps to 210 mm, so 4 px per mm.
        let plan = paginate(840, 400).unwrap();
        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.pages[0].y_offset_mm, Decimal::ZERO);
        assert_eq!(plan.image_height_mm, dec!(100));
    }

    #[test]
    fn two_and_a_half_pages_round_up_to_three() {
        // 2970 px at 4 px/mm is 742.5 mm, 2.5 page heights.
        let plan = paginate(840, 2970).unwrap();
        assert_eq!(plan.page_count(), 3);
        assert_eq!(plan.image_height_mm, dec!(742.5));
        assert_eq!(plan.pages[0].y_offset_mm, dec!(0));
        assert_eq!(plan.pages[1].y_offset_mm, dec!(-297));
        assert_eq!(plan.pages[2].y_offset_mm, dec!(-594));
    }

    #[test]
    fn exact_page_multiple_gets_no_trailing_blank() {
        let plan = paginate(840, 2376).unwrap();
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.image_height_mm, dec!(594));
    }

    #[test]
    fn offsets_step_by_exactly_one_page_height() {
        let plan = paginate(500, 20_000).unwrap();
        for pair in plan.pages.windows(2) {
            assert_eq!(pair[0].y_offset_mm - pair[1].y_offset_mm, A4_HEIGHT_MM);
        }
    }

    #[test]
    fn empty_raster_is_rejected() {
        assert!(matches!(
            paginate(0, 100),
            Err(ExportError::Pagination(_))
        ));
        assert!(matches!(
            paginate(100, 0),
            Err(ExportError::Pagination(_))
        ));
    }
}
