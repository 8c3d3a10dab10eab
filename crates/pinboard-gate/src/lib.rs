//! Validation gate for Pinboard.
//!
//! Every entry and every link must pass application-defined rules before it
//! becomes visible, whether it originated locally (commit) or arrived from a
//! remote participant (put). The gate guarantees two properties the rest of
//! the system relies on:
//!
//! - **Commit/put symmetry** — [`ValidationGate::validate_commit`] and
//!   [`ValidationGate::validate_put`] are thin wrappers over one shared
//!   evaluation of [`AppRules::validate_entry`], so the rule set is identical
//!   regardless of where an entry originated.
//! - **Fail-closed** — a rule that errors or panics rejects; there is no
//!   fault path that accepts.
//!
//! Rules must be read-only with respect to the store and index: they decide,
//! they do not commit.

pub mod error;
pub mod gate;
pub mod rules;

pub use error::GateError;
pub use gate::{ValidationGate, Verdict};
pub use rules::AppRules;
