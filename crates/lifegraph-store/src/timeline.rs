//! The timeline: the owned, ordered collection of life events.
//!
//! The [`Timeline`] struct is the single owner of the event list for a
//! session. Consumers (chart, list, analysis, export) read snapshots;
//! mutation happens only through [`Timeline::add`] and
//! [`Timeline::remove`], never by direct collection manipulation.
//!
//! # Invariants
//!
//! - Events are always sorted ascending by `age`. Ties keep insertion
//!   order: a new event with an already-present age lands after the
//!   existing ones.
//! - Identifiers are unique for the lifetime of the session and never
//!   reused, even when an event is deleted and an identical one re-added.
//! - No event violating the age/happiness domain enters the store;
//!   callers validate drafts via [`validate_draft`] first.
//!
//! [`validate_draft`]: crate::validate::validate_draft

use chrono::Utc;
use lifegraph_types::{EventDraft, LifeEvent, LifeEventId};
use tracing::debug;

/// The ordered, in-memory collection of life events for one session.
///
/// No I/O, no persistence: state is ephemeral and single-user. Each
/// mutation produces a new observable snapshot; callers must not assume
/// a slice returned before a mutation is still current after it.
#[derive(Debug, Default, Clone)]
pub struct Timeline {
    /// All events, sorted ascending by age (insertion-stable on ties).
    events: Vec<LifeEvent>,
}

impl Timeline {
    /// Create a new empty timeline.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Create a timeline pre-seeded with the default starter events.
    ///
    /// These are the four examples the app ships with so a first-time
    /// user sees a populated chart.
    pub fn seeded() -> Self {
        let mut timeline = Self::new();
        let seeds = [
            (7, 8, "초등학교 입학, 새로운 친구들을 만났다!"),
            (9, 9, "처음으로 자전거 두 발로 타기 성공!"),
            (10, 5, "키우던 햄스터가 무지개 다리를 건넜다"),
            (12, 10, "가족들과 함께 떠난 신나는 캠핑 여행!"),
        ];
        for (age, happiness, description) in seeds {
            let _ = timeline.add(EventDraft::new(age, happiness, description.to_owned()));
        }
        timeline
    }

    /// Return the number of events in the timeline.
    pub const fn len(&self) -> usize {
        self.events.len()
    }

    /// Return whether the timeline has no events.
    pub const fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the current ordered snapshot.
    pub fn events(&self) -> &[LifeEvent] {
        &self.events
    }

    /// Add a validated candidate event.
    ///
    /// Assigns a fresh [`LifeEventId`], stamps the creation time, and
    /// inserts at the position that keeps the ascending-age order, with
    /// tied ages appended after existing ties. Returns the updated
    /// ordered snapshot.
    ///
    /// The draft must already have passed boundary validation; the store
    /// does not re-check the domain constraints.
    pub fn add(&mut self, draft: EventDraft) -> &[LifeEvent] {
        let event = LifeEvent {
            id: LifeEventId::new(),
            age: draft.age,
            happiness: draft.happiness,
            description: draft.description,
            image: draft.image,
            created_at: Utc::now(),
        };

        // partition_point over a sorted vec: first index whose age is
        // strictly greater, so equal ages stay in insertion order.
        let at = self.events.partition_point(|e| e.age <= event.age);
        debug!(id = %event.id, age = event.age, position = at, "event added");
        self.events.insert(at, event);
        &self.events
    }

    /// Remove the event with the given identifier, if present.
    ///
    /// Removing an unknown identifier is a no-op, not an error. Returns
    /// whether an event was actually removed.
    pub fn remove(&mut self, id: LifeEventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        let removed = self.events.len() != before;
        debug!(%id, removed, "event removal requested");
        removed
    }
}
