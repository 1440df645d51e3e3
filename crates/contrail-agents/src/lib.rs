//! Agent-level logic for Contrail AI airlines.
//!
//! Everything here is pure: functions take a random source and reference
//! data and return values. Persistence and scheduling live in
//! `contrail-core`.
//!
//! # Modules
//!
//! - [`identity`] -- Unique name and code generation with bounded retries.
//! - [`personality`] -- Per-personality fare, expansion, and fleet-size bias.
//! - [`fleet`] -- Family-biased aircraft choice for founding and expansion.
//! - [`weighted`] -- Probability rolls and weighted categorical draws.
//! - [`error`] -- Identity exhaustion errors.

pub mod error;
pub mod fleet;
pub mod identity;
pub mod personality;
pub mod weighted;

pub use error::IdentityError;
pub use fleet::{
    EXPANSION_FAMILY_BIAS, FAMILY_REUSE_PROBABILITY, pick_expansion_type, pick_initial_fleet,
    within_capacity,
};
pub use identity::{AirlineIdentity, CodeKind, TakenIdentities, generate_identity};
pub use personality::{CapacityBand, PersonalityBias, draw_personality};
pub use weighted::{draw_service, roll, weighted_pick};
