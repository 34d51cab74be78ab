//! Prompt construction for the life analysis request.
//!
//! The instructional template is fixed and compiled into the binary; it
//! asks for a warm, structured, markdown-formatted life-journey narrative
//! in Korean. Events are formatted into the template's `[인생 데이터]`
//! block as one fixed-template line each, joined by newlines.

use lifegraph_types::LifeEvent;
use minijinja::Environment;

use crate::error::AnalysisError;

/// The fixed life-coach instruction template.
const ANALYSIS_TEMPLATE: &str = include_str!("../templates/analysis.j2");

/// Renders the analysis prompt from an event snapshot.
///
/// Wraps a `minijinja` [`Environment`] with the single analysis template
/// pre-loaded.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create a new prompt engine with the analysis template loaded.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Template`] if the compiled-in template
    /// fails to parse (a build defect, not a runtime condition).
    pub fn new() -> Result<Self, AnalysisError> {
        let mut env = Environment::new();
        env.add_template("analysis", ANALYSIS_TEMPLATE)
            .map_err(|e| AnalysisError::Template(format!("failed to add analysis template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the full prompt for the given event snapshot.
    pub fn render(&self, events: &[LifeEvent]) -> Result<String, AnalysisError> {
        let life_data = format_events(events);
        self.env
            .get_template("analysis")
            .map_err(|e| AnalysisError::Template(format!("missing analysis template: {e}")))?
            .render(minijinja::context! { life_data })
            .map_err(|e| AnalysisError::Template(format!("analysis render failed: {e}")))
    }
}

/// Format events as fixed-template lines joined by newlines.
///
/// One line per event: `나이: {age}, 행복 점수: {happiness}/10, 사건:
/// {description}`.
fn format_events(events: &[LifeEvent]) -> String {
    let lines: Vec<String> = events
        .iter()
        .map(|e| {
            format!(
                "나이: {}, 행복 점수: {}/10, 사건: {}",
                e.age, e.happiness, e.description
            )
        })
        .collect();
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use lifegraph_types::LifeEventId;

    use super::*;

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
    fn events_format_as_fixed_lines() {
        let events = vec![event(7, 8, "초등학교 입학"), event(10, 5, "햄스터와 이별")];
        assert_eq!(
            format_events(&events),
            "나이: 7, 행복 점수: 8/10, 사건: 초등학교 입학\n나이: 10, 행복 점수: 5/10, 사건: 햄스터와 이별"
        );
    }

    #[test]
    fn rendered_prompt_embeds_the_data_block() {
        let engine = PromptEngine::new().unwrap();
        let events = vec![
            event(7, 8, "초등학교 입학"),
            event(9, 9, "자전거 타기 성공"),
            event(10, 5, "햄스터와 이별"),
        ];
        let prompt = engine.render(&events).unwrap();

        assert!(prompt.contains("라이프 코치"));
        assert!(prompt.contains("[인생 데이터]"));
        assert!(prompt.contains("나이: 9, 행복 점수: 9/10, 사건: 자전거 타기 성공"));
        assert!(prompt.contains("[요청]"));
        assert!(prompt.contains("마크다운 형식"));
    }

    #[test]
    fn empty_snapshot_renders_an_empty_data_block() {
        // The client's precondition stops empty snapshots earlier; the
        // engine itself treats any input as renderable.
        let engine = PromptEngine::new().unwrap();
        let prompt = engine.render(&[]).unwrap();
        assert!(prompt.contains("[인생 데이터]"));
    }
}
