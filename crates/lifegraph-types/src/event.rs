//! Core entity structs for the life timeline.
//!
//! A [`LifeEvent`] is one recorded moment: an age, a happiness score, a
//! description, and an optional embedded photo. Events are immutable once
//! stored; there is no edit operation, only add and delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::LifeEventId;

/// Upper bound of the valid age domain (inclusive).
pub const MAX_AGE: u8 = 120;

/// Lower bound of the valid happiness domain (inclusive).
pub const MIN_HAPPINESS: u8 = 1;

/// Upper bound of the valid happiness domain (inclusive).
pub const MAX_HAPPINESS: u8 = 10;

// ---------------------------------------------------------------------------
// EmbeddedImage
// ---------------------------------------------------------------------------

/// A self-contained embedded photo owned by a single event.
///
/// The pixel buffer is raw RGB8, row-major, exactly
/// `width * height * 3` bytes. No network reference is ever stored;
/// converting a user-supplied image file into this form happens at the
/// intake boundary, outside this crate. Over the wire the pixel buffer
/// is carried as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmbeddedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Raw RGB8 pixel data, row-major, base64 on the wire.
    #[serde(with = "base64_bytes")]
    #[ts(as = "String")]
    pub pixels: Vec<u8>,
}

impl EmbeddedImage {
    /// The pixel buffer length a well-formed image of these dimensions
    /// must have, or `None` if the dimensions overflow.
    pub fn expected_len(&self) -> Option<usize> {
        let w = usize::try_from(self.width).ok()?;
        let h = usize::try_from(self.height).ok()?;
        w.checked_mul(h)?.checked_mul(3)
    }

    /// Whether the pixel buffer matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.expected_len() == Some(self.pixels.len())
    }
}

/// Serde adapter carrying a byte buffer as standard base64.
mod base64_bytes {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as a base64 string.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    /// Deserialize a base64 string into bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// LifeEvent
// ---------------------------------------------------------------------------

/// One recorded life event.
///
/// Constructed only by the event store from a validated [`EventDraft`];
/// the id is assigned at that point and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifeEvent {
    /// Stable unique identifier, assigned at creation.
    pub id: LifeEventId,
    /// Age at which the event happened. Domain: 1 to 120.
    pub age: u8,
    /// Happiness score. Domain: 1 (very unhappy) to 10 (very happy).
    pub happiness: u8,
    /// Non-empty description of what happened.
    pub description: String,
    /// Optional embedded photo.
    pub image: Option<EmbeddedImage>,
    /// When the event was recorded.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// EventDraft
// ---------------------------------------------------------------------------

/// A candidate life event missing only the identifier.
///
/// Drafts come from the input form (or any programmatic caller) and must
/// pass boundary validation before the store turns them into a
/// [`LifeEvent`]. Malformed input never enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventDraft {
    /// Age at which the event happened.
    pub age: u8,
    /// Happiness score.
    pub happiness: u8,
    /// Description of what happened.
    pub description: String,
    /// Optional embedded photo.
    pub image: Option<EmbeddedImage>,
}

impl EventDraft {
    /// Convenience constructor for a draft without a photo.
    pub const fn new(age: u8, happiness: u8, description: String) -> Self {
        Self {
            age,
            happiness,
            description,
            image: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tiny_image() -> EmbeddedImage {
        EmbeddedImage {
            width: 2,
            height: 2,
            pixels: vec![0; 12],
        }
    }

    #[test]
    fn well_formed_image_accepts_matching_buffer() {
        assert!(tiny_image().is_well_formed());
    }

    #[test]
    fn short_buffer_is_malformed() {
        let mut image = tiny_image();
        image.pixels.truncate(5);
        assert!(!image.is_well_formed());
    }

    #[test]
    fn zero_dimension_is_malformed() {
        let mut image = tiny_image();
        image.width = 0;
        image.pixels.clear();
        assert!(!image.is_well_formed());
    }

    #[test]
    fn image_pixels_serialize_as_base64() {
        let image = EmbeddedImage {
            width: 1,
            height: 1,
            pixels: vec![255, 0, 0],
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["pixels"], "/wAA");

        let back: EmbeddedImage = serde_json::from_value(json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn draft_round_trips_through_json() {
        let draft = EventDraft::new(10, 5, "처음으로 햄스터를 키웠어요".to_owned());
        let json = serde_json::to_string(&draft).unwrap();
        let back: EventDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}
