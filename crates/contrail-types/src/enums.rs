//! Enumeration types for the Contrail simulation.
//!
//! Every branching attribute of a world, airline, airport or notification is
//! a closed variant here, never a free-form string.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Difficulty tier of a world. Selects the AI parameter profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Difficulty {
    /// Few, cautious competitors; bankrupt airlines are not replaced.
    Easy,
    /// The default profile.
    Normal,
    /// Dense, well-capitalised, aggressive competition.
    Hard,
}

impl core::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Normal => write!(f, "normal"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Lifecycle status of a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum WorldStatus {
    /// Time advances and agents are scheduled.
    Active,
    /// Time is frozen; no agent work runs.
    Paused,
    /// The world is over; nothing is scheduled ever again.
    Ended,
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// World region used for spawn quotas and name flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Region {
    /// United States, Canada, Mexico, Caribbean.
    NorthAmerica,
    /// South and Central America.
    SouthAmerica,
    /// Europe including Turkey and Russia west of the Urals.
    Europe,
    /// Africa.
    Africa,
    /// Gulf states, Levant, Iran.
    MiddleEast,
    /// East, South and South-East Asia.
    Asia,
    /// Australia, New Zealand and the Pacific islands.
    Oceania,
}

impl Region {
    /// Every region, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::NorthAmerica,
        Self::SouthAmerica,
        Self::Europe,
        Self::Africa,
        Self::MiddleEast,
        Self::Asia,
        Self::Oceania,
    ];
}

/// Size class of an airport.
///
/// Declaration order is rank order: a hub outranks a major airport, which
/// outranks a regional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AirportClass {
    /// Intercontinental hub.
    Hub,
    /// Major domestic or international airport.
    Major,
    /// Regional airport with limited runway and gate capacity.
    Regional,
}

// ---------------------------------------------------------------------------
// Airline behaviour
// ---------------------------------------------------------------------------

/// Fixed behavioural bias of an AI airline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Personality {
    /// Prices high, buys small aircraft, expands reluctantly.
    Conservative,
    /// Middle of the road on every decision.
    Balanced,
    /// Undercuts fares, buys large aircraft, expands eagerly.
    Aggressive,
}

impl core::fmt::Display for Personality {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Conservative => write!(f, "conservative"),
            Self::Balanced => write!(f, "balanced"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

/// Quality tier of an onboard service choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServiceTier {
    /// No-frills.
    Basic,
    /// Typical full-service level.
    Standard,
    /// Above-market quality.
    Premium,
}

/// Cabin class used when pricing a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CabinClass {
    /// Economy cabin.
    Economy,
    /// Business cabin.
    Business,
    /// First-class cabin.
    First,
}

/// Direction of a flight instance relative to its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FlightDirection {
    /// Origin to destination.
    Outbound,
    /// Destination back to origin.
    Inbound,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Display priority of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationPriority {
    /// Informational.
    Low,
    /// Worth a glance.
    Normal,
    /// Directly affects the player.
    High,
}

/// Category used by the UI to group notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum NotificationCategory {
    /// A competitor entered or left the market.
    Competitor,
    /// A competitor changed fares against the player.
    Pricing,
}
