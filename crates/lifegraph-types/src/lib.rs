//! Shared type definitions for the Lifegraph application.
//!
//! This crate is the single source of truth for the types used across the
//! Lifegraph workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the browser frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`event`] -- The life event record, its draft form, and embedded images

pub mod event;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use event::{EmbeddedImage, EventDraft, LifeEvent, MAX_AGE, MAX_HAPPINESS, MIN_HAPPINESS};
pub use ids::LifeEventId;

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::LifeEventId::export_all();
        let _ = crate::event::LifeEvent::export_all();
        let _ = crate::event::EventDraft::export_all();
        let _ = crate::event::EmbeddedImage::export_all();
    }
}
