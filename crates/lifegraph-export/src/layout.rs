//! Off-screen document layout for export.
//!
//! The printable document is composed off-screen at a fixed base width,
//! then rasterized and sliced into pages. [`build_document_layout`]
//! produces the block sequence in its fixed order: title and date,
//! chart, the event log section, then the analysis text. Which blocks
//! appear depends only on the inputs, never on what the screen
//! currently shows.
//!
//! [`OffscreenStage`] guards the single composition slot. A claim hands
//! out a [`StageLease`] whose drop releases the slot, so the stage is
//! freed on success and failure alike.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Datelike, Utc};
use lifegraph_markup::{Block, Line, parse};
use lifegraph_types::{EmbeddedImage, LifeEvent};

use crate::error::ExportError;
use crate::font::GLYPH_SIZE;

/// Base composition width in unscaled pixels.
pub const PAGE_WIDTH: u32 = 800;
/// Inner padding on every side of the composed document.
pub const PAGE_PADDING: u32 = 40;
/// Height of the chart area inside the document.
pub const CHART_HEIGHT: u32 = 360;
/// Side length of an event thumbnail.
pub const THUMBNAIL_SIZE: u32 = 80;

/// Font scale used for body text, in multiples of the 8px glyph cell.
pub const BODY_SCALE: u32 = 2;
/// Font scale used for the document title.
pub const TITLE_SCALE: u32 = 4;
/// Font scale used for section headings.
pub const HEADING_SCALE: u32 = 3;

const LINE_GAP: u32 = 6;
const BLOCK_GAP: u32 = 16;

/// One block of printable content with its vertical placement resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedBlock {
    /// Top edge in unscaled document pixels.
    pub y: u32,
    /// Block height in unscaled document pixels.
    pub height: u32,
    /// The content itself.
    pub content: BlockContent,
}

/// The printable content kinds the document is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    /// Document title, e.g. `이름의 인생 행복 그래프`.
    Title(String),
    /// Centered sub-line under the title, e.g. `분석일: 2026. 8. 31.`.
    Subtitle(String),
    /// The happiness chart, rendered to fill the content width.
    Chart,
    /// A section heading such as `나의 인생 기록`.
    SectionHeading(String),
    /// One timeline entry: age, score and description, with an optional
    /// thumbnail.
    EventEntry {
        /// Age label line, `{age}세`.
        age_label: String,
        /// Score line, `행복 점수: {happiness}/10`.
        score_label: String,
        /// Wrapped description lines.
        description: Vec<String>,
        /// Thumbnail pixels, when the event carries a photo.
        image: Option<EmbeddedImage>,
    },
    /// One parsed line of the analysis text.
    MarkupLine(Line),
    /// Horizontal rule between sections.
    Divider,
}

/// The fully measured document, ready for rasterization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    /// Total width in unscaled pixels.
    pub width: u32,
    /// Total height in unscaled pixels, padding included.
    pub height: u32,
    /// Blocks in reading order, top to bottom.
    pub blocks: Vec<PlacedBlock>,
}

impl DocumentLayout {
    /// Width available to content between the side paddings.
    pub const fn content_width(&self) -> u32 {
        self.width.saturating_sub(PAGE_PADDING.saturating_mul(2))
    }
}

/// Format a timestamp the way the on-screen date reads: `2026. 8. 31.`
/// (no zero padding on month or day).
pub fn format_analysis_date(at: DateTime<Utc>) -> String {
    format!("{}. {}. {}.", at.year(), at.month(), at.day())
}

/// Compose the printable document from its inputs.
///
/// `analysis` is the raw analysis text; it is parsed here once and the
/// resulting lines are what both measurement and rasterization consume.
pub fn build_document_layout(
    name: &str,
    analyzed_at: DateTime<Utc>,
    events: &[LifeEvent],
    analysis: &str,
) -> Result<DocumentLayout, ExportError> {
    let mut cursor = Cursor::new();

    cursor.push(
        line_height(TITLE_SCALE),
        BlockContent::Title(format!("{name}의 인생 행복 그래프")),
    )?;
    cursor.push(
        line_height(BODY_SCALE),
        BlockContent::Subtitle(format!("분석일: {}", format_analysis_date(analyzed_at))),
    )?;
    cursor.gap(BLOCK_GAP)?;

    cursor.push(CHART_HEIGHT, BlockContent::Chart)?;
    cursor.gap(BLOCK_GAP)?;
    cursor.push(2, BlockContent::Divider)?;
    cursor.gap(BLOCK_GAP)?;

    cursor.push(
        line_height(HEADING_SCALE),
        BlockContent::SectionHeading("나의 인생 기록".to_owned()),
    )?;
    let content_width = PAGE_WIDTH.saturating_sub(PAGE_PADDING.saturating_mul(2));
    for event in events {
        let entry = event_entry(event, content_width);
        let height = event_entry_height(&entry);
        cursor.push(height, entry)?;
        cursor.gap(LINE_GAP)?;
    }
    cursor.gap(BLOCK_GAP)?;
    cursor.push(2, BlockContent::Divider)?;
    cursor.gap(BLOCK_GAP)?;

    cursor.push(
        line_height(HEADING_SCALE),
        BlockContent::SectionHeading("AI 인생 분석 결과".to_owned()),
    )?;
    for line in parse(analysis) {
        let height = markup_line_height(&line);
        cursor.push(height, BlockContent::MarkupLine(line))?;
    }

    Ok(DocumentLayout {
        width: PAGE_WIDTH,
        height: cursor.finish()?,
        blocks: cursor.blocks,
    })
}

/// Running vertical placement during composition.
struct Cursor {
    y: u32,
    blocks: Vec<PlacedBlock>,
}

impl Cursor {
    const fn new() -> Self {
        Self {
            y: PAGE_PADDING,
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, height: u32, content: BlockContent) -> Result<(), ExportError> {
        self.blocks.push(PlacedBlock {
            y: self.y,
            height,
            content,
        });
        self.advance(height)
    }

    fn gap(&mut self, height: u32) -> Result<(), ExportError> {
        self.advance(height)
    }

    fn advance(&mut self, height: u32) -> Result<(), ExportError> {
        self.y = self
            .y
            .checked_add(height)
            .ok_or(ExportError::ArithmeticOverflow)?;
        Ok(())
    }

    fn finish(&self) -> Result<u32, ExportError> {
        self.y
            .checked_add(PAGE_PADDING)
            .ok_or(ExportError::ArithmeticOverflow)
    }
}

/// Height of one text line at a font scale, gap included.
const fn line_height(scale: u32) -> u32 {
    GLYPH_SIZE.saturating_mul(scale).saturating_add(LINE_GAP)
}

fn event_entry(event: &LifeEvent, content_width: u32) -> BlockContent {
    let text_width = if event.image.is_some() {
        content_width
            .saturating_sub(THUMBNAIL_SIZE)
            .saturating_sub(BLOCK_GAP)
    } else {
        content_width
    };
    BlockContent::EventEntry {
        age_label: format!("{}세", event.age),
        score_label: format!("행복 점수: {}/10", event.happiness),
        description: wrap_text(&event.description, text_width, BODY_SCALE),
        image: event.image.clone(),
    }
}

fn event_entry_height(entry: &BlockContent) -> u32 {
    let BlockContent::EventEntry {
        description, image, ..
    } = entry
    else {
        return 0;
    };
    let lines = u32::try_from(description.len()).unwrap_or(u32::MAX);
    // Age and score lines, then the wrapped description.
    let text_h = line_height(BODY_SCALE)
        .saturating_mul(lines.saturating_add(2));
    if image.is_some() {
        text_h.max(THUMBNAIL_SIZE)
    } else {
        text_h
    }
}

fn markup_line_height(line: &Line) -> u32 {
    match line.block {
        Block::H1 => line_height(TITLE_SCALE),
        Block::H2 | Block::H3 => line_height(HEADING_SCALE),
        Block::ListItem | Block::Paragraph => line_height(BODY_SCALE),
    }
}

/// Greedy character wrap on the fixed glyph grid.
///
/// Every glyph cell is the same width, so the budget is simply the
/// number of cells that fit. An empty input still yields one empty line
/// so blank lines keep their height.
fn wrap_text(text: &str, max_width: u32, scale: u32) -> Vec<String> {
    let cell = GLYPH_SIZE.saturating_mul(scale.max(1));
    let budget = usize::try_from(max_width.checked_div(cell).unwrap_or(1).max(1)).unwrap_or(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut count = 0_usize;
    for ch in text.chars() {
        if count >= budget {
            lines.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count = count.saturating_add(1);
    }
    lines.push(current);
    lines
}

/// Single-occupancy guard for the off-screen composition slot.
#[derive(Debug, Default)]
pub struct OffscreenStage {
    occupied: AtomicBool,
}

impl OffscreenStage {
    /// Create a vacant stage.
    pub const fn new() -> Self {
        Self {
            occupied: AtomicBool::new(false),
        }
    }

    /// Claim the stage, failing if an export already holds it.
    pub fn claim(&self) -> Result<StageLease<'_>, ExportError> {
        if self
            .occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ExportError::StageBusy);
        }
        Ok(StageLease { stage: self })
    }

    /// Whether an export currently holds the stage.
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }
}

/// Holds the off-screen stage for the duration of one export.
///
/// Dropping the lease releases the stage, which is what guarantees
/// cleanup on every exit path.
#[derive(Debug)]
pub struct StageLease<'a> {
    stage: &'a OffscreenStage,
}

impl Drop for StageLease<'_> {
    fn drop(&mut self) {
        self.stage.occupied.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use lifegraph_types::LifeEventId;

    fn event(age: u8, happiness: u8, description: &str) -> LifeEvent {
        LifeEvent {
            id: LifeEventId::new(),
            age,
            happiness,
            description: description.to_owned(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn date_formats_without_zero_padding() {
        let at = Utc.with_ymd_and_hms(2026, 8, 3, 12, 0, 0).unwrap();
        assert_eq!(format_analysis_date(at), "2026. 8. 3.");
    }

    #[test]
    fn blocks_come_in_fixed_reading_order() {
        let events = vec![event(7, 9, "초등학교 입학")];
        let layout =
            build_document_layout("홍길동", Utc::now(), &events, "# 요약\n본문").unwrap();

        assert!(matches!(
            layout.blocks[0].content,
            BlockContent::Title(ref t) if t == "홍길동의 인생 행복 그래프"
        ));
        let chart_at = layout
            .blocks
            .iter()
            .position(|b| b.content == BlockContent::Chart)
            .unwrap();
        let record_at = layout
            .blocks
            .iter()
            .position(|b| {
                matches!(&b.content, BlockContent::SectionHeading(h) if h == "나의 인생 기록")
            })
            .unwrap();
        let analysis_at = layout
            .blocks
            .iter()
            .position(|b| {
                matches!(&b.content, BlockContent::SectionHeading(h) if h == "AI 인생 분석 결과")
            })
            .unwrap();
        assert!(chart_at < record_at && record_at < analysis_at);
    }

    #[test]
    fn placement_is_monotonic_and_bounded() {
        let events = vec![event(7, 9, "입학"), event(12, 3, "전학")];
        let layout = build_document_layout("이름", Utc::now(), &events, "분석 텍스트").unwrap();
        let mut prev = 0;
        for block in &layout.blocks {
            assert!(block.y >= prev);
            prev = block.y;
            assert!(block.y + block.height <= layout.height);
        }
        assert_eq!(layout.width, PAGE_WIDTH);
    }

    #[test]
    fn long_descriptions_wrap_instead_of_overflowing() {
        let wrapped = wrap_text(&"가".repeat(100), 160, BODY_SCALE);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn stage_admits_one_lease_at_a_time() {
        let stage = OffscreenStage::new();
        let lease = stage.claim().unwrap();
        assert!(matches!(stage.claim(), Err(ExportError::StageBusy)));
        drop(lease);
        assert!(!stage.is_occupied());
        let _second = stage.claim().unwrap();
    }
}
