//! The export pipeline: compose, rasterize, paginate, emit.
//!
//! [`Exporter::export`] is the one entry point. It checks its
//! preconditions, claims the off-screen stage, and runs the stages in
//! order; the stage lease is dropped on every exit path, so a failed
//! export never wedges the next one. A failure produces no artifact at
//! all, never a partial document.

use chrono::{DateTime, Utc};
use lifegraph_types::LifeEvent;

use crate::error::ExportError;
use crate::layout::{OffscreenStage, build_document_layout};
use crate::paginate::paginate;
use crate::pdf::write_pdf;
use crate::raster::{RasterImage, WHITE};
use crate::rasterizer::{BlockRasterizer, Rasterizer};

/// Rasterization magnification for print sharpness.
pub const RASTER_SCALE: u32 = 2;

/// Everything one export needs, borrowed from the session.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    /// Person's name, used in the document title and the filename.
    pub name: &'a str,
    /// The analysis text, if one has been produced.
    pub analysis: Option<&'a str>,
    /// Timeline events in ascending age order.
    pub events: &'a [LifeEvent],
    /// Snapshot of the happiness chart, if one is available.
    pub chart: Option<&'a RasterImage>,
    /// Moment the analysis was produced; printed under the title.
    pub analyzed_at: DateTime<Utc>,
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfArtifact {
    /// Suggested filename, `{name}_인생_행복_그래프.pdf`.
    pub filename: String,
    /// The complete PDF byte stream.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: u32,
}

/// Runs exports over a rasterizer and the shared off-screen stage.
#[derive(Debug, Default)]
pub struct Exporter<R = BlockRasterizer> {
    stage: OffscreenStage,
    rasterizer: R,
}

impl Exporter<BlockRasterizer> {
    /// Exporter over the built-in block rasterizer.
    pub const fn new() -> Self {
        Self {
            stage: OffscreenStage::new(),
            rasterizer: BlockRasterizer,
        }
    }
}

impl<R: Rasterizer> Exporter<R> {
    /// Exporter over a caller-supplied rasterizer.
    pub const fn with_rasterizer(rasterizer: R) -> Self {
        Self {
            stage: OffscreenStage::new(),
            rasterizer,
        }
    }

    /// Whether an export is currently running.
    pub fn is_exporting(&self) -> bool {
        self.stage.is_occupied()
    }

    /// Run one export end to end.
    pub fn export(&self, request: &ExportRequest<'_>) -> Result<PdfArtifact, ExportError> {
        let analysis = request
            .analysis
            .filter(|text| !text.is_empty())
            .ok_or(ExportError::MissingAnalysis)?;
        let chart = request
            .chart
            .filter(|c| !c.is_empty())
            .ok_or(ExportError::MissingChart)?;

        let _lease = self.stage.claim()?;
        tracing::info!(
            name = request.name,
            events = request.events.len(),
            "starting pdf export"
        );

        let layout =
            build_document_layout(request.name, request.analyzed_at, request.events, analysis)?;
        let raster = self
            .rasterizer
            .rasterize(&layout, chart, RASTER_SCALE, WHITE)?;
        let plan = paginate(raster.width(), raster.height())?;
        let bytes = write_pdf(&raster, &plan)?;

        let artifact = PdfArtifact {
            filename: format!("{}_인생_행복_그래프.pdf", request.name),
            page_count: plan.page_count(),
            bytes,
        };
        tracing::info!(
            filename = artifact.filename,
            pages = artifact.page_count,
            byte_len = artifact.bytes.len(),
            "pdf export complete"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::DocumentLayout;
    use crate::raster::{ORANGE, Rgb};
    use chrono::Utc;
    use lifegraph_types::LifeEventId;

    fn event(age: u8, happiness: u8) -> LifeEvent {
        LifeEvent {
            id: LifeEventId::new(),
            age,
            happiness,
            description: "테스트 사건".to_owned(),
            image: None,
            created_at: Utc::now(),
        }
    }

    fn chart() -> RasterImage {
        RasterImage::new(200, 100, ORANGE).unwrap()
    }

    fn request<'a>(
        analysis: Option<&'a str>,
        events: &'a [LifeEvent],
        chart: Option<&'a RasterImage>,
    ) -> ExportRequest<'a> {
        ExportRequest {
            name: "홍길동",
            analysis,
            events,
            chart,
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn export_produces_a_named_pdf_artifact() {
        let exporter = Exporter::new();
        let events = vec![event(7, 9), event(12, 3)];
        let snapshot = chart();
        let artifact = exporter
            .export(&request(Some("# 분석\n요약입니다."), &events, Some(&snapshot)))
            .unwrap();
        assert_eq!(artifact.filename, "홍길동_인생_행복_그래프.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF-1.4"));
        assert!(artifact.page_count >= 1);
        assert!(!exporter.is_exporting());
    }

    #[test]
    fn missing_analysis_fails_before_claiming_the_stage() {
        let exporter = Exporter::new();
        let events = vec![event(7, 9)];
        let snapshot = chart();
        let err = exporter
            .export(&request(None, &events, Some(&snapshot)))
            .unwrap_err();
        assert_eq!(err, ExportError::MissingAnalysis);
        assert!(!exporter.is_exporting());
    }

    #[test]
    fn zero_area_chart_fails_the_precondition() {
        // A present-but-empty snapshot would blit nothing and emit a
        // document with a blank chart region; it must fail like an
        // absent one.
        let exporter = Exporter::new();
        let snapshot = RasterImage::new(0, 0, ORANGE).unwrap();
        let err = exporter
            .export(&request(Some("분석"), &[], Some(&snapshot)))
            .unwrap_err();
        assert_eq!(err, ExportError::MissingChart);
        assert!(!exporter.is_exporting());
    }

    #[test]
    fn empty_analysis_text_fails_the_precondition() {
        let exporter = Exporter::new();
        let snapshot = chart();
        let err = exporter
            .export(&request(Some(""), &[], Some(&snapshot)))
            .unwrap_err();
        assert_eq!(err, ExportError::MissingAnalysis);
    }

    #[test]
    fn missing_chart_fails_before_claiming_the_stage() {
        let exporter = Exporter::new();
        let err = exporter
            .export(&request(Some("분석"), &[], None))
            .unwrap_err();
        assert_eq!(err, ExportError::MissingChart);
        assert!(!exporter.is_exporting());
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn rasterize(
            &self,
            _layout: &DocumentLayout,
            _chart: &RasterImage,
            _scale: u32,
            _background: Rgb,
        ) -> Result<RasterImage, ExportError> {
            Err(ExportError::Rasterize("simulated failure".to_owned()))
        }
    }

    #[test]
    fn failed_export_releases_the_stage() {
        let exporter = Exporter::with_rasterizer(FailingRasterizer);
        let snapshot = chart();
        let err = exporter
            .export(&request(Some("분석"), &[], Some(&snapshot)))
            .unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
        assert!(!exporter.is_exporting());
    }
}
