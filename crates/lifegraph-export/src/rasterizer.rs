//! Turning a measured layout into pixels.
//!
//! [`Rasterizer`] is the seam between layout and pagination: anything
//! that can turn a [`DocumentLayout`] plus a chart snapshot into one
//! tall raster can drive the pipeline. [`BlockRasterizer`] is the
//! built-in implementation on the crate's own drawing primitives; its
//! glyph coverage is ASCII plus box placeholders, which keeps every
//! block at its true extent even where shaping is unavailable.

use lifegraph_markup::{Block, Emphasis, Line};

use crate::error::ExportError;
use crate::font;
use crate::layout::{
    BODY_SCALE, BlockContent, DocumentLayout, HEADING_SCALE, PAGE_PADDING, THUMBNAIL_SIZE,
    TITLE_SCALE,
};
use crate::raster::{ORANGE, RED, RULE, RasterImage, Rgb, SLATE, SLATE_MUTED};

/// Renders a measured layout into a single tall raster.
pub trait Rasterizer {
    /// Rasterize `layout` at an integer magnification onto a solid
    /// background. The chart snapshot fills the layout's chart block.
    fn rasterize(
        &self,
        layout: &DocumentLayout,
        chart: &RasterImage,
        scale: u32,
        background: Rgb,
    ) -> Result<RasterImage, ExportError>;
}

/// Built-in rasterizer over the crate's bitmap font and fills.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockRasterizer;

impl Rasterizer for BlockRasterizer {
    fn rasterize(
        &self,
        layout: &DocumentLayout,
        chart: &RasterImage,
        scale: u32,
        background: Rgb,
    ) -> Result<RasterImage, ExportError> {
        let scale = scale.max(1);
        let width = layout
            .width
            .checked_mul(scale)
            .ok_or(ExportError::ArithmeticOverflow)?;
        let height = layout
            .height
            .checked_mul(scale)
            .ok_or(ExportError::ArithmeticOverflow)?;
        let mut surface = RasterImage::new(width, height, background)?;

        let pad = PAGE_PADDING.saturating_mul(scale);
        let content_w = layout.content_width().saturating_mul(scale);
        for block in &layout.blocks {
            let y = block
                .y
                .checked_mul(scale)
                .ok_or(ExportError::ArithmeticOverflow)?;
            let h = block.height.saturating_mul(scale);
            match &block.content {
                BlockContent::Title(text) => {
                    draw_centered(&mut surface, y, text, TITLE_SCALE.saturating_mul(scale), SLATE);
                }
                BlockContent::Subtitle(text) => {
                    draw_centered(
                        &mut surface,
                        y,
                        text,
                        BODY_SCALE.saturating_mul(scale),
                        SLATE_MUTED,
                    );
                }
                BlockContent::Chart => {
                    surface.blit_scaled(chart, pad, y, content_w, h);
                }
                BlockContent::SectionHeading(text) => {
                    font::draw_text(
                        &mut surface,
                        pad,
                        y,
                        text,
                        HEADING_SCALE.saturating_mul(scale),
                        SLATE,
                    );
                    let rule_y = i64::from(y.saturating_add(h));
                    surface.draw_line(
                        (i64::from(pad), rule_y),
                        (i64::from(pad.saturating_add(content_w)), rule_y),
                        scale,
                        RULE,
                    );
                }
                BlockContent::EventEntry {
                    age_label,
                    score_label,
                    description,
                    image,
                } => {
                    draw_event_entry(
                        &mut surface,
                        pad,
                        y,
                        scale,
                        age_label,
                        score_label,
                        description,
                        image.as_ref(),
                    )?;
                }
                BlockContent::MarkupLine(line) => {
                    draw_markup_line(&mut surface, pad, y, scale, line);
                }
                BlockContent::Divider => {
                    surface.fill_rect(pad, y, content_w, h, RULE);
                }
            }
        }

        Ok(surface)
    }
}

fn draw_centered(surface: &mut RasterImage, y: u32, text: &str, scale: u32, color: Rgb) {
    let w = font::text_width(text, scale);
    let x = surface.width().saturating_sub(w).checked_div(2).unwrap_or(0);
    font::draw_text(surface, x, y, text, scale, color);
}

#[allow(clippy::too_many_arguments)]
fn draw_event_entry(
    surface: &mut RasterImage,
    x: u32,
    y: u32,
    scale: u32,
    age_label: &str,
    score_label: &str,
    description: &[String],
    image: Option<&lifegraph_types::EmbeddedImage>,
) -> Result<(), ExportError> {
    let mut text_x = x;
    if let Some(img) = image {
        let thumb = RasterImage::from_pixels(img.width, img.height, img.pixels.clone())?;
        let side = THUMBNAIL_SIZE.saturating_mul(scale);
        surface.blit_scaled(&thumb, x, y, side, side);
        text_x = x.saturating_add(side).saturating_add(16_u32.saturating_mul(scale));
    }

    let body = BODY_SCALE.saturating_mul(scale);
    let line_h = font::GLYPH_SIZE
        .saturating_mul(body)
        .saturating_add(6_u32.saturating_mul(scale));
    let mut line_y = y;
    font::draw_text(surface, text_x, line_y, age_label, body, ORANGE);
    line_y = line_y.saturating_add(line_h);
    font::draw_text(surface, text_x, line_y, score_label, body, SLATE_MUTED);
    for line in description {
        line_y = line_y.saturating_add(line_h);
        font::draw_text(surface, text_x, line_y, line, body, SLATE);
    }
    Ok(())
}

fn draw_markup_line(surface: &mut RasterImage, x: u32, y: u32, scale: u32, line: &Line) {
    let (text_scale, color) = match line.block {
        Block::H1 => (TITLE_SCALE, SLATE),
        Block::H2 => (HEADING_SCALE, RED),
        Block::H3 => (HEADING_SCALE, ORANGE),
        Block::ListItem | Block::Paragraph => (BODY_SCALE, SLATE),
    };
    let text_scale = text_scale.saturating_mul(scale);

    let mut cursor = x;
    if line.block == Block::ListItem {
        cursor = font::draw_text(surface, cursor, y, "- ", text_scale, SLATE_MUTED);
    }
    for span in &line.spans {
        let next = font::draw_text(surface, cursor, y, &span.text, text_scale, color);
        if span.emphasis == Emphasis::Strong {
            // Double strike one pixel over stands in for a bold face.
            font::draw_text(surface, cursor.saturating_add(1), y, &span.text, text_scale, color);
        }
        cursor = next;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::build_document_layout;
    use crate::raster::WHITE;
    use chrono::Utc;

    fn small_chart() -> RasterImage {
        RasterImage::new(40, 20, ORANGE).unwrap()
    }

    #[test]
    fn surface_scales_with_the_magnification_factor() {
        let layout = build_document_layout("이름", Utc::now(), &[], "분석").unwrap();
        let chart = small_chart();
        let at_1 = BlockRasterizer
            .rasterize(&layout, &chart, 1, WHITE)
            .unwrap();
        let at_2 = BlockRasterizer
            .rasterize(&layout, &chart, 2, WHITE)
            .unwrap();
        assert_eq!(at_2.width(), at_1.width().saturating_mul(2));
        assert_eq!(at_2.height(), at_1.height().saturating_mul(2));
    }

    #[test]
    fn chart_pixels_land_inside_the_content_area() {
        let layout = build_document_layout("이름", Utc::now(), &[], "분석").unwrap();
        let chart = small_chart();
        let page = BlockRasterizer
            .rasterize(&layout, &chart, 1, WHITE)
            .unwrap();
        let orange_found = (0..page.height())
            .any(|y| (0..page.width()).any(|x| page.get_pixel(x, y) == Some(ORANGE)));
        assert!(orange_found);
    }

    #[test]
    fn zero_scale_is_clamped_to_one() {
        let layout = build_document_layout("이름", Utc::now(), &[], "분석").unwrap();
        let page = BlockRasterizer
            .rasterize(&layout, &small_chart(), 0, WHITE)
            .unwrap();
        assert_eq!(page.width(), layout.width);
    }
}
