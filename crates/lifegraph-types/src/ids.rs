//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every stored entity has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered), so identifiers assigned later in a session always
//! compare greater than earlier ones and are never reused.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a recorded life event.
    LifeEventId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = LifeEventId::new();
        let b = LifeEventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_time_ordered() {
        // UUID v7 embeds a millisecond timestamp in the high bits, so a
        // later id never sorts below an earlier one.
        let earlier = LifeEventId::new();
        let later = LifeEventId::new();
        assert!(earlier <= later);
    }

    #[test]
    fn id_round_trips_through_json() {
        let id = LifeEventId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: LifeEventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
