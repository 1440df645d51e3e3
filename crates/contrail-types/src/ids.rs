//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every record in the airline world has a strongly-typed ID so that an
//! airline id can never be passed where a route id is expected. All IDs use
//! UUID v7 (time-ordered) so that insertion order is also index order.

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
    /// Unique identifier for a game world.
    WorldId
}

define_id! {
    /// Unique identifier for an airline (human or AI).
    AirlineId
}

define_id! {
    /// Unique identifier for an airport in the directory.
    AirportId
}

define_id! {
    /// Unique identifier for an aircraft type in the fleet catalog.
    AircraftTypeId
}

define_id! {
    /// Unique identifier for a single aircraft owned by an airline.
    FleetUnitId
}

define_id! {
    /// Unique identifier for a scheduled route.
    RouteId
}

define_id! {
    /// Unique identifier for a recurring weekly flight instance.
    FlightId
}

define_id! {
    /// Unique identifier for a player-facing notification.
    NotificationId
}

define_id! {
    /// Unique identifier for a deferred replacement-spawn task.
    ScheduledSpawnId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct() {
        let first = AirlineId::new();
        let second = AirlineId::new();
        assert_ne!(first, second);
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = RouteId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = WorldId::new();
        let json = serde_json::to_string(&original).unwrap_or_default();
        let restored: Result<WorldId, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok(), Some(original));
    }
}
