//! PDF export pipeline for the life happiness graph.
//!
//! The printable document is composed off-screen from the timeline, the
//! chart snapshot and the analysis text, rasterized at print
//! magnification, sliced across A4 pages, and wrapped in a minimal
//! PDF 1.4 container. [`Exporter`] drives the whole sequence; the
//! [`Rasterizer`] trait is the seam for swapping in a renderer with
//! richer text shaping than the built-in bitmap font.

pub mod chart;
pub mod error;
pub mod font;
pub mod layout;
pub mod paginate;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod rasterizer;

pub use chart::render_chart;
pub use error::ExportError;
pub use layout::{DocumentLayout, OffscreenStage, StageLease, build_document_layout};
pub use paginate::{PaginationPlan, paginate};
pub use pipeline::{ExportRequest, Exporter, PdfArtifact, RASTER_SCALE};
pub use raster::{RasterImage, Rgb};
pub use rasterizer::{BlockRasterizer, Rasterizer};
