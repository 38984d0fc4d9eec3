//! Type-safe identifiers for schedule and booking rows.
//!
//! All identifiers wrap the SQLite `INTEGER PRIMARY KEY AUTOINCREMENT`
//! rowid of their table. The newtypes exist so a day id can never be
//! bound where a slot id was meant.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            ToSchema,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw rowid.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw rowid for query binding.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

row_id! {
    /// Identifier of a bookable [`Day`](super::Day) row.
    DayId
}

row_id! {
    /// Identifier of a [`TimeSlot`](super::TimeSlot) row.
    SlotId
}

row_id! {
    /// Identifier of a booking ledger row (see
    /// [`BookingDetails`](super::BookingDetails)).
    BookingId
}

row_id! {
    /// Stable requester identity (e.g. a chat account id).
    ///
    /// The ledger enforces at most one active booking per `UserId`.
    UserId
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_integer() {
        let id = DayId::new(42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn serde_is_transparent() {
        let id = SlotId::new(7);
        let json = serde_json::to_string(&id).ok();
        let Some(json) = json else {
            panic!("serialization failed");
        };
        assert_eq!(json, "7");
        let back: Option<SlotId> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(id));
    }

    #[test]
    fn conversions_round_trip() {
        let id = UserId::from(99);
        assert_eq!(i64::from(id), 99);
        assert_eq!(id.get(), 99);
    }

    #[test]
    fn hash_works_in_hashmap() {
        use std::collections::HashMap;
        let id = BookingId::new(3);
        let mut map = HashMap::new();
        map.insert(id, "test");
        assert_eq!(map.get(&id), Some(&"test"));
    }
}
