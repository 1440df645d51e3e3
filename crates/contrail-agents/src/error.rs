//! Error types for the contrail-agents crate.
//!
//! Identity exhaustion is the only failure here. Callers treat it as a
//! skipped spawn slot, never as a fatal condition.

use crate::identity::CodeKind;

/// Errors that can occur while generating an airline identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No unique display name after every simple and compound attempt.
    #[error("no unique airline name after {attempts} attempts")]
    NameExhausted {
        /// Total attempts made.
        attempts: u32,
    },

    /// No unique code after every patterned and uniform attempt.
    #[error("no unique {kind} code after {attempts} attempts")]
    CodeExhausted {
        /// Code space that was exhausted.
        kind: CodeKind,
        /// Total attempts made.
        attempts: u32,
    },
}
