//! Presentation session: one user's timeline plus the result lifecycle.
//!
//! The session is a small state machine over five phases. Exactly one
//! analysis or export can be in flight at a time, and the analysis
//! outcome (text or the stable error notice) is held here until the
//! user dismisses it. Timeline edits are refused while an operation is
//! in flight, matching a form that is disabled during the wait.
//!
//! ```text
//! Idle -> Analyzing -> ShowingResult <-> Exporting
//!              \-> ShowingError
//! ShowingResult / ShowingError -> Idle   (dismiss)
//! ```

use lifegraph_store::{Timeline, ValidationError, validate_draft};
use lifegraph_types::{EventDraft, LifeEvent, LifeEventId};

/// Where the session currently is in the result lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No analysis running, nothing on display.
    Idle,
    /// An analysis request is in flight.
    Analyzing,
    /// Analysis text is on display; export is available.
    ShowingResult,
    /// The stable analysis error notice is on display.
    ShowingError,
    /// An export is in flight; started from `ShowingResult`.
    Exporting,
}

/// Why a session operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A timeline edit failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An analysis or export is in flight; edits and new requests wait.
    #[error("an operation is already in flight (phase {phase:?})")]
    Busy {
        /// The phase that refused the request.
        phase: SessionPhase,
    },

    /// Export requested with no analysis result on display.
    #[error("export is only available while a result is showing")]
    NoResultToExport,

    /// Fewer events than the analysis minimum.
    #[error("analysis needs at least {minimum} events, {provided} present")]
    NotEnoughEvents {
        /// Required minimum.
        minimum: usize,
        /// Events currently on the timeline.
        provided: usize,
    },
}

/// One user's timeline, analysis outcome and lifecycle phase.
#[derive(Debug)]
pub struct Session {
    timeline: Timeline,
    phase: SessionPhase,
    analysis: Option<String>,
    error_notice: Option<&'static str>,
    min_events: usize,
}

impl Session {
    /// Session over an existing timeline, starting idle.
    pub const fn new(timeline: Timeline, min_events: usize) -> Self {
        Self {
            timeline,
            phase: SessionPhase::Idle,
            analysis: None,
            error_notice: None,
            min_events,
        }
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Timeline events in ascending age order.
    pub fn events(&self) -> &[LifeEvent] {
        self.timeline.events()
    }

    /// The analysis text currently held, if any.
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// The stable error notice currently on display, if any.
    pub const fn error_notice(&self) -> Option<&'static str> {
        self.error_notice
    }

    const fn in_flight(&self) -> bool {
        matches!(self.phase, SessionPhase::Analyzing | SessionPhase::Exporting)
    }

    fn ensure_not_busy(&self) -> Result<(), SessionError> {
        if self.in_flight() {
            return Err(SessionError::Busy { phase: self.phase });
        }
        Ok(())
    }

    /// Validate and add an event; returns the re-sorted timeline.
    pub fn add_event(&mut self, draft: EventDraft) -> Result<&[LifeEvent], SessionError> {
        self.ensure_not_busy()?;
        validate_draft(&draft)?;
        Ok(self.timeline.add(draft))
    }

    /// Remove an event by id. Unknown ids are a quiet no-op.
    pub fn remove_event(&mut self, id: LifeEventId) -> Result<bool, SessionError> {
        self.ensure_not_busy()?;
        Ok(self.timeline.remove(id))
    }

    /// Enter `Analyzing` and hand back the event snapshot to analyze.
    ///
    /// Refused while an operation is in flight or when the timeline has
    /// fewer than the minimum events, so the precondition surfaces
    /// before any request leaves the machine.
    pub fn begin_analysis(&mut self) -> Result<Vec<LifeEvent>, SessionError> {
        self.ensure_not_busy()?;
        let provided = self.timeline.events().len();
        if provided < self.min_events {
            return Err(SessionError::NotEnoughEvents {
                minimum: self.min_events,
                provided,
            });
        }
        self.phase = SessionPhase::Analyzing;
        self.analysis = None;
        self.error_notice = None;
        Ok(self.timeline.events().to_vec())
    }

    /// Land the analysis outcome: text shows the result, an error shows
    /// its stable notice. Ignored unless an analysis is in flight.
    pub fn finish_analysis(&mut self, outcome: Result<String, &'static str>) {
        if self.phase != SessionPhase::Analyzing {
            return;
        }
        match outcome {
            Ok(text) => {
                self.analysis = Some(text);
                self.phase = SessionPhase::ShowingResult;
            }
            Err(notice) => {
                self.error_notice = Some(notice);
                self.phase = SessionPhase::ShowingError;
            }
        }
    }

    /// Clear whatever is on display and return to `Idle`.
    pub fn dismiss(&mut self) {
        if matches!(
            self.phase,
            SessionPhase::ShowingResult | SessionPhase::ShowingError
        ) {
            self.analysis = None;
            self.error_notice = None;
            self.phase = SessionPhase::Idle;
        }
    }

    /// Enter `Exporting`; only a displayed result can be exported.
    /// Returns the analysis text the export will print.
    pub fn begin_export(&mut self) -> Result<&str, SessionError> {
        match self.phase {
            SessionPhase::ShowingResult => {}
            SessionPhase::Analyzing | SessionPhase::Exporting => {
                return Err(SessionError::Busy { phase: self.phase });
            }
            SessionPhase::Idle | SessionPhase::ShowingError => {
                return Err(SessionError::NoResultToExport);
            }
        }
        self.phase = SessionPhase::Exporting;
        self.analysis.as_deref().ok_or(SessionError::NoResultToExport)
    }

    /// Export finished, success or not; the result stays on display.
    pub fn finish_export(&mut self) {
        if self.phase == SessionPhase::Exporting {
            self.phase = SessionPhase::ShowingResult;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ready_session() -> Session {
        let mut session = Session::new(Timeline::new(), 3);
        for age in [5, 10, 15] {
            session
                .add_event(EventDraft::new(age, 5, format!("{age}살의 일")))
                .unwrap();
        }
        session
    }

    #[test]
    fn invalid_draft_is_refused_with_the_form_message() {
        let mut session = Session::new(Timeline::new(), 3);
        let err = session
            .add_event(EventDraft::new(0, 5, "유효하지 않음".to_owned()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(session.events().is_empty());
    }

    #[test]
    fn analysis_needs_the_minimum_event_count() {
        let mut session = Session::new(Timeline::new(), 3);
        session
            .add_event(EventDraft::new(5, 5, "하나뿐".to_owned()))
            .unwrap();
        let err = session.begin_analysis().unwrap_err();
        assert_eq!(
            err,
            SessionError::NotEnoughEvents {
                minimum: 3,
                provided: 1
            }
        );
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn successful_analysis_reaches_showing_result() {
        let mut session = ready_session();
        let snapshot = session.begin_analysis().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(session.phase(), SessionPhase::Analyzing);
        session.finish_analysis(Ok("# 분석 결과".to_owned()));
        assert_eq!(session.phase(), SessionPhase::ShowingResult);
        assert_eq!(session.analysis(), Some("# 분석 결과"));
    }

    #[test]
    fn failed_analysis_shows_the_notice_and_dismiss_clears_it() {
        let mut session = ready_session();
        session.begin_analysis().unwrap();
        session.finish_analysis(Err("AI 분석에 실패했습니다. 잠시 후 다시 시도해주세요."));
        assert_eq!(session.phase(), SessionPhase::ShowingError);
        assert!(session.error_notice().is_some());
        session.dismiss();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.error_notice().is_none());
    }

    #[test]
    fn edits_are_refused_while_analyzing() {
        let mut session = ready_session();
        session.begin_analysis().unwrap();
        let err = session
            .add_event(EventDraft::new(20, 5, "편집 시도".to_owned()))
            .unwrap_err();
        assert!(matches!(err, SessionError::Busy { .. }));
        assert!(matches!(
            session.begin_analysis(),
            Err(SessionError::Busy { .. })
        ));
    }

    #[test]
    fn export_is_only_reachable_from_a_displayed_result() {
        let mut session = ready_session();
        assert_eq!(
            session.begin_export().unwrap_err(),
            SessionError::NoResultToExport
        );

        session.begin_analysis().unwrap();
        session.finish_analysis(Ok("결과".to_owned()));
        let text = session.begin_export().unwrap().to_owned();
        assert_eq!(text, "결과");
        assert_eq!(session.phase(), SessionPhase::Exporting);

        // Double export is refused until the first lands.
        assert!(matches!(
            session.begin_export(),
            Err(SessionError::Busy { .. })
        ));
        session.finish_export();
        assert_eq!(session.phase(), SessionPhase::ShowingResult);
        assert_eq!(session.analysis(), Some("결과"));
    }

    #[test]
    fn stray_completions_do_not_move_the_machine() {
        let mut session = ready_session();
        session.finish_analysis(Ok("유령 결과".to_owned()));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.analysis().is_none());
        session.finish_export();
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
