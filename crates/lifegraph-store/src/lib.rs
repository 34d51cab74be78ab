//! In-memory event store for the Lifegraph application.
//!
//! Owns the ordered collection of [`LifeEvent`] records and its mutation
//! operations. State is ephemeral, single-session, and single-user: no
//! persistence, no sync, no concurrent editing.
//!
//! # Modules
//!
//! - [`timeline`] -- The [`Timeline`] struct: the owned, sorted collection.
//! - [`validate`] -- Boundary validation for candidate events.
//! - [`error`] -- The [`ValidationError`] taxonomy.
//!
//! [`LifeEvent`]: lifegraph_types::LifeEvent

pub mod error;
pub mod timeline;
pub mod validate;

pub use error::ValidationError;
pub use timeline::Timeline;
pub use validate::validate_draft;
