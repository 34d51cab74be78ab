//! Life happiness graph application binary.
//!
//! Runs one full cycle against a seeded timeline: analyze the life
//! events through the configured text-generation backend, render the
//! narrative for the screen, then export the printable PDF next to the
//! working directory.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load backend configuration from the environment
//! 3. Seed the timeline and open a session
//! 4. Run the analysis cycle
//! 5. Render the narrative for the screen
//! 6. Export and write the PDF artifact

mod error;
mod session;

use lifegraph_analysis::{AnalysisClient, AnalysisConfig, MIN_EVENTS_FOR_ANALYSIS};
use lifegraph_export::{ExportRequest, Exporter, render_chart};
use lifegraph_markup::{StyleTarget, render_html};
use lifegraph_store::Timeline;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;
use crate::session::Session;

/// Chart dimensions used for the export snapshot, unscaled pixels.
const CHART_WIDTH: u32 = 720;
const CHART_HEIGHT: u32 = 360;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the analysis cycle, or the
/// export pipeline fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("lifegraph starting");

    // 2. Load backend configuration.
    let config = AnalysisConfig::from_env()?;
    info!(backend = ?config.backend_type, model = config.model, "Configuration loaded");

    // 3. Seed the timeline and open a session.
    let name = std::env::var("LIFEGRAPH_USER_NAME").unwrap_or_else(|_| "나".to_owned());
    let mut session = Session::new(Timeline::seeded(), MIN_EVENTS_FOR_ANALYSIS);
    info!(
        name = name,
        event_count = session.events().len(),
        "Session opened over the seeded timeline"
    );

    // 4. Run the analysis cycle.
    let client = AnalysisClient::new(&config)?;
    let snapshot = session.begin_analysis().map_err(AppError::from)?;
    let analyzed_at = chrono::Utc::now();
    match client.analyze(&snapshot).await {
        Ok(text) => session.finish_analysis(Ok(text)),
        Err(e) => {
            // The session keeps only the stable notice; the full cause
            // travels out through the typed error.
            error!(error = %e, "Analysis failed");
            session.finish_analysis(Err(e.user_message()));
            return Err(Box::new(AppError::Analysis(e)) as Box<dyn std::error::Error>);
        }
    }

    // 5. Render the narrative for the screen.
    let analysis = session.analysis().unwrap_or_default().to_owned();
    let screen_html = render_html(&analysis, StyleTarget::Screen);
    info!(html_len = screen_html.len(), "Narrative rendered for screen");

    // 6. Export and write the PDF artifact.
    let chart = render_chart(session.events(), CHART_WIDTH, CHART_HEIGHT)?;
    let text = session.begin_export().map_err(AppError::from)?.to_owned();
    let exporter = Exporter::new();
    let result = exporter.export(&ExportRequest {
        name: &name,
        analysis: Some(&text),
        events: session.events(),
        chart: Some(&chart),
        analyzed_at,
    });
    session.finish_export();
    let artifact = result?;

    std::fs::write(&artifact.filename, &artifact.bytes).map_err(AppError::from)?;
    info!(
        filename = artifact.filename,
        pages = artifact.page_count,
        byte_len = artifact.bytes.len(),
        "Artifact written"
    );

    Ok(())
}
