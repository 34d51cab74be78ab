//! Raster rendering of the happiness-over-age line chart.
//!
//! The chart mirrors the interactive on-screen graph: white background,
//! light grid, an orange polyline with square markers at each data
//! point, age along the x axis and a fixed 0..=10 happiness y axis.

use lifegraph_types::{LifeEvent, MAX_HAPPINESS};

use crate::error::ExportError;
use crate::font::{self, GLYPH_SIZE};
use crate::raster::{ORANGE, RULE, RasterImage, Rgb, SLATE_MUTED, WHITE};

/// Space reserved left of the plot for y-axis tick labels.
const MARGIN_LEFT: u32 = 40;
/// Space reserved below the plot for x-axis tick labels.
const MARGIN_BOTTOM: u32 = 24;
const MARGIN_TOP: u32 = 16;
const MARGIN_RIGHT: u32 = 16;

/// Stroke width of the data polyline.
const LINE_THICKNESS: u32 = 3;
/// Side length of the square marker drawn on each data point.
const MARKER_SIZE: u32 = 7;

/// Render the happiness chart for a set of events, oldest age leftmost.
///
/// Events are expected in ascending age order, as the timeline keeps
/// them. An empty slice still yields axes and grid so the exported
/// document keeps its shape.
pub fn render_chart(
    events: &[LifeEvent],
    width: u32,
    height: u32,
) -> Result<RasterImage, ExportError> {
    let min_w = MARGIN_LEFT.saturating_add(MARGIN_RIGHT).saturating_add(20);
    let min_h = MARGIN_TOP.saturating_add(MARGIN_BOTTOM).saturating_add(20);
    if width < min_w || height < min_h {
        return Err(ExportError::Rasterize(format!(
            "chart surface {width}x{height} is too small to plot into"
        )));
    }

    let mut surface = RasterImage::new(width, height, WHITE)?;
    let plot = PlotArea::new(width, height, events);

    draw_grid(&mut surface, &plot);
    draw_axis_labels(&mut surface, &plot);
    draw_series(&mut surface, &plot, events);

    Ok(surface)
}

/// Pixel extent of the plotting rectangle plus the age domain mapped
/// onto it.
struct PlotArea {
    left: u32,
    top: u32,
    inner_w: u32,
    inner_h: u32,
    age_min: u8,
    age_max: u8,
}

impl PlotArea {
    fn new(width: u32, height: u32, events: &[LifeEvent]) -> Self {
        let age_min = events.first().map_or(0, |e| e.age);
        let age_max = events.last().map_or(10, |e| e.age).max(age_min);
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            inner_w: width
                .saturating_sub(MARGIN_LEFT)
                .saturating_sub(MARGIN_RIGHT),
            inner_h: height
                .saturating_sub(MARGIN_TOP)
                .saturating_sub(MARGIN_BOTTOM),
            age_min,
            age_max,
        }
    }

    /// x pixel for an age, clamped to the plot rectangle.
    fn map_x(&self, age: u8) -> i64 {
        let span = i64::from(self.age_max.saturating_sub(self.age_min)).max(1);
        let offset = i64::from(age.saturating_sub(self.age_min));
        let scaled = offset
            .saturating_mul(i64::from(self.inner_w))
            .checked_div(span)
            .unwrap_or(0);
        i64::from(self.left).saturating_add(scaled)
    }

    /// y pixel for a happiness score on the fixed 0..=10 domain.
    fn map_y(&self, happiness: u8) -> i64 {
        let scaled = i64::from(happiness.min(MAX_HAPPINESS))
            .saturating_mul(i64::from(self.inner_h))
            .checked_div(i64::from(MAX_HAPPINESS))
            .unwrap_or(0);
        i64::from(self.top)
            .saturating_add(i64::from(self.inner_h))
            .saturating_sub(scaled)
    }

    const fn bottom(&self) -> u32 {
        self.top.saturating_add(self.inner_h)
    }

    const fn right(&self) -> u32 {
        self.left.saturating_add(self.inner_w)
    }
}

fn draw_grid(surface: &mut RasterImage, plot: &PlotArea) {
    // Horizontal rule per even happiness tick, then the two axis lines.
    for tick in (0..=MAX_HAPPINESS).step_by(2) {
        let y = plot.map_y(tick);
        surface.draw_line(
            (i64::from(plot.left), y),
            (i64::from(plot.right()), y),
            1,
            RULE,
        );
    }
    surface.draw_line(
        (i64::from(plot.left), i64::from(plot.top)),
        (i64::from(plot.left), i64::from(plot.bottom())),
        1,
        SLATE_MUTED,
    );
    surface.draw_line(
        (i64::from(plot.left), i64::from(plot.bottom())),
        (i64::from(plot.right()), i64::from(plot.bottom())),
        1,
        SLATE_MUTED,
    );
}

fn draw_axis_labels(surface: &mut RasterImage, plot: &PlotArea) {
    for tick in (0..=MAX_HAPPINESS).step_by(2) {
        let label = tick.to_string();
        let label_w = font::text_width(&label, 1);
        let x = plot.left.saturating_sub(label_w).saturating_sub(6);
        let y = u32::try_from(plot.map_y(tick))
            .unwrap_or(0)
            .saturating_sub(GLYPH_SIZE / 2);
        font::draw_text(surface, x, y, &label, 1, SLATE_MUTED);
    }

    let label_y = plot.bottom().saturating_add(8);
    for age in [plot.age_min, plot.age_max] {
        let label = age.to_string();
        let center = u32::try_from(plot.map_x(age)).unwrap_or(0);
        let x = center.saturating_sub(font::text_width(&label, 1) / 2);
        font::draw_text(surface, x, label_y, &label, 1, SLATE_MUTED);
    }
}

fn draw_series(surface: &mut RasterImage, plot: &PlotArea, events: &[LifeEvent]) {
    for pair in events.windows(2) {
        if let [a, b] = pair {
            surface.draw_line(
                (plot.map_x(a.age), plot.map_y(a.happiness)),
                (plot.map_x(b.age), plot.map_y(b.happiness)),
                LINE_THICKNESS,
                ORANGE,
            );
        }
    }
    for event in events {
        draw_marker(surface, plot.map_x(event.age), plot.map_y(event.happiness));
    }
}

/// Square marker centered on a data point.
fn draw_marker(surface: &mut RasterImage, cx: i64, cy: i64) {
    let half = i64::from(MARKER_SIZE / 2);
    let x = u32::try_from(cx.saturating_sub(half)).unwrap_or(0);
    let y = u32::try_from(cy.saturating_sub(half)).unwrap_or(0);
    surface.fill_rect(x, y, MARKER_SIZE, MARKER_SIZE, ORANGE);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lifegraph_types::LifeEventId;

    fn event(age: u8, happiness: u8) -> LifeEvent {
        LifeEvent {
            id: LifeEventId::new(),
            age,
            happiness,
            description: "테스트".to_owned(),
            image: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn renders_on_a_white_background_with_orange_series() {
        let events = vec![event(5, 2), event(10, 9)];
        let chart = render_chart(&events, 400, 200).unwrap();
        assert_eq!(chart.width(), 400);
        assert_eq!(chart.height(), 200);
        let has_orange = (0..chart.height()).any(|y| {
            (0..chart.width()).any(|x| chart.get_pixel(x, y) == Some(ORANGE))
        });
        assert!(has_orange);
    }

    #[test]
    fn empty_timeline_still_yields_axes() {
        let chart = render_chart(&[], 400, 200).unwrap();
        let has_axis = (0..chart.height()).any(|y| {
            (0..chart.width()).any(|x| chart.get_pixel(x, y) == Some(SLATE_MUTED))
        });
        assert!(has_axis);
    }

    #[test]
    fn higher_happiness_plots_higher_on_the_surface() {
        let events = vec![event(5, 1), event(10, 10)];
        let plot = PlotArea::new(400, 200, &events);
        assert!(plot.map_y(10) < plot.map_y(1));
        assert!(plot.map_x(10) > plot.map_x(5));
    }

    #[test]
    fn undersized_surface_is_rejected() {
        let err = render_chart(&[], 10, 10).unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(_)));
    }
}
