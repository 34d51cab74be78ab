//! Minimal PDF 1.4 emission for rasterized pages.
//!
//! The document model is deliberately small: one `FlateDecode` RGB
//! image XObject shared by every page, and one content stream per page
//! that paints that image at the offset pagination chose. Cross
//! reference offsets are computed while writing, so the output is a
//! complete, self-contained file.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use rust_decimal::Decimal;

use crate::error::ExportError;
use crate::paginate::{A4_HEIGHT_MM, A4_WIDTH_MM, PaginationPlan};
use crate::raster::RasterImage;

/// Points per millimeter numerator: 72 pt per inch.
const PT_PER_INCH: Decimal = Decimal::from_parts(72, 0, 0, false, 0);
/// Millimeters per inch.
const MM_PER_INCH: Decimal = Decimal::from_parts(254, 0, 0, false, 1);

/// Convert millimeters to points, rounded to two decimals.
fn mm_to_pt(mm: Decimal) -> Result<Decimal, ExportError> {
    mm.checked_mul(PT_PER_INCH)
        .and_then(|v| v.checked_div(MM_PER_INCH))
        .map(|v| v.round_dp(2).normalize())
        .ok_or(ExportError::ArithmeticOverflow)
}

/// Serialize the paginated raster as a PDF 1.4 byte stream.
pub fn write_pdf(raster: &RasterImage, plan: &PaginationPlan) -> Result<Vec<u8>, ExportError> {
    if raster.is_empty() {
        return Err(ExportError::Pdf("refusing to embed an empty raster".into()));
    }
    if plan.pages.is_empty() {
        return Err(ExportError::Pdf("pagination plan holds no pages".into()));
    }

    let page_count = plan.pages.len();
    let object_count = page_count
        .checked_mul(2)
        .and_then(|n| n.checked_add(3))
        .ok_or(ExportError::ArithmeticOverflow)?;

    let page_w_pt = mm_to_pt(A4_WIDTH_MM)?;
    let page_h_pt = mm_to_pt(A4_HEIGHT_MM)?;
    let image_w_pt = mm_to_pt(plan.image_width_mm)?;
    let image_h_pt = mm_to_pt(plan.image_height_mm)?;

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");

    // 1-based object byte offsets for the xref table.
    let mut offsets: Vec<usize> = Vec::with_capacity(object_count);

    let kids = (0..page_count)
        .map(|i| Ok(format!("{} 0 R", page_object_id(i)?)))
        .collect::<Result<Vec<_>, ExportError>>()?
        .join(" ");

    begin_object(&mut out, &mut offsets, 1)?;
    out.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

    begin_object(&mut out, &mut offsets, 2)?;
    write_fmt(
        &mut out,
        &format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>\nendobj\n"),
    );

    begin_object(&mut out, &mut offsets, 3)?;
    let compressed = compress_pixels(raster.pixels())?;
    write_fmt(
        &mut out,
        &format!(
            "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode \
             /Length {} >>\nstream\n",
            raster.width(),
            raster.height(),
            compressed.len()
        ),
    );
    out.extend_from_slice(&compressed);
    out.extend_from_slice(b"\nendstream\nendobj\n");

    for (i, page) in plan.pages.iter().enumerate() {
        let page_id = page_object_id(i)?;
        let content_id = page_id
            .checked_add(1)
            .ok_or(ExportError::ArithmeticOverflow)?;

        begin_object(&mut out, &mut offsets, page_id)?;
        write_fmt(
            &mut out,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {page_w_pt} {page_h_pt}] \
                 /Resources << /XObject << /Im0 3 0 R >> >> \
                 /Contents {content_id} 0 R >>\nendobj\n"
            ),
        );

        // The image top sits at `y_offset_mm` from the page top; PDF
        // y grows upward from the bottom, so translate accordingly.
        let offset_pt = mm_to_pt(page.y_offset_mm)?;
        let y_pt = page_h_pt
            .checked_sub(offset_pt)
            .and_then(|v| v.checked_sub(image_h_pt))
            .ok_or(ExportError::ArithmeticOverflow)?;
        let content = format!("q {image_w_pt} 0 0 {image_h_pt} 0 {y_pt} cm /Im0 Do Q");

        begin_object(&mut out, &mut offsets, content_id)?;
        write_fmt(
            &mut out,
            &format!("<< /Length {} >>\nstream\n{content}\nendstream\nendobj\n", content.len()),
        );
    }

    let xref_at = out.len();
    write_fmt(&mut out, &format!("xref\n0 {}\n", offsets.len().saturating_add(1)));
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in &offsets {
        write_fmt(&mut out, &format!("{offset:010} 00000 n \n"));
    }
    write_fmt(
        &mut out,
        &format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            offsets.len().saturating_add(1)
        ),
    );

    Ok(out)
}

/// Object id of the page dictionary for a zero-based page index.
fn page_object_id(index: usize) -> Result<usize, ExportError> {
    index
        .checked_mul(2)
        .and_then(|n| n.checked_add(4))
        .ok_or(ExportError::ArithmeticOverflow)
}

/// Record the upcoming object's byte offset and emit its header line.
fn begin_object(
    out: &mut Vec<u8>,
    offsets: &mut Vec<usize>,
    id: usize,
) -> Result<(), ExportError> {
    if offsets.len().saturating_add(1) != id {
        return Err(ExportError::Pdf(format!(
            "object {id} written out of sequence"
        )));
    }
    offsets.push(out.len());
    write_fmt(out, &format!("{id} 0 obj\n"));
    Ok(())
}

fn write_fmt(out: &mut Vec<u8>, text: &str) {
    out.extend_from_slice(text.as_bytes());
}

fn compress_pixels(pixels: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(pixels)
        .and_then(|()| encoder.finish())
        .map_err(|e| ExportError::Pdf(format!("flate compression failed: {e}")))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use crate::paginate::paginate;
    use crate::raster::{RasterImage, WHITE};
    use rust_decimal_macros::dec;

    fn pdf_for(width: u32, height: u32) -> Vec<u8> {
        let raster = RasterImage::new(width, height, WHITE).unwrap();
        let plan = paginate(width, height).unwrap();
        write_pdf(&raster, &plan).unwrap()
    }

    #[test]
    fn output_is_framed_as_a_pdf_file() {
        let bytes = pdf_for(84, 100);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn media_box_is_a4_portrait_in_points() {
        let text = String::from_utf8_lossy(&pdf_for(84, 100)).into_owned();
        assert!(text.contains("/MediaBox [0 0 595.28 841.89]"));
    }

    #[test]
    fn one_content_stream_per_page_all_reference_the_shared_image() {
        // 840 px wide at 4 px/mm, 2970 px tall: three pages.
        let text = String::from_utf8_lossy(&pdf_for(840, 2970)).into_owned();
        assert_eq!(text.matches("/Type /Page ").count(), 3);
        assert_eq!(text.matches("/Im0 Do").count(), 3);
        assert_eq!(text.matches("/Subtype /Image").count(), 1);
    }

    #[test]
    fn later_pages_shift_the_image_up_by_page_heights() {
        let text = String::from_utf8_lossy(&pdf_for(840, 2970)).into_owned();
        // image height 742.5 mm = 2104.72 pt; page height 841.89 pt.
        // Page 0: 841.89 - 2104.72; page 1 adds one page height.
        assert!(text.contains("0 -1262.83 cm"));
        assert!(text.contains("0 -420.94 cm"));
        assert!(text.contains("0 420.95 cm"));
    }

    #[test]
    fn xref_offsets_point_at_object_headers() {
        let bytes = pdf_for(84, 100);
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref_at = text.find("xref\n0 ").unwrap();
        let entries = text[xref_at..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with("n "))
            .collect::<Vec<_>>();
        for (i, entry) in entries.iter().enumerate() {
            let offset: usize = entry[..10].parse().unwrap();
            let header = format!("{} 0 obj", i + 1);
            assert!(bytes[offset..].starts_with(header.as_bytes()));
        }
    }

    #[test]
    fn mm_to_pt_rounds_to_two_decimals() {
        assert_eq!(mm_to_pt(dec!(210)).unwrap(), dec!(595.28));
        assert_eq!(mm_to_pt(dec!(297)).unwrap(), dec!(841.89));
        assert_eq!(mm_to_pt(Decimal::ZERO).unwrap(), Decimal::ZERO);
    }
}
