//! Link index for Pinboard.
//!
//! A [`Link`] is a directed, tagged association `(base, target, tag)` between
//! entry identifiers. The index answers "all targets attached under this base
//! and tag", in attachment order.
//!
//! # Policy
//!
//! - Bases must resolve through the content store at attach time; attaching
//!   under an unknown base is rejected with [`LinkError::UnknownBase`].
//! - Targets may dangle at attach time (participant registration attaches
//!   raw agent ids that name no entry). Resolution happens at read time, and
//!   only for the loading query.
//! - No deduplication: re-attaching an identical triple appends a duplicate.
//! - Appends under the same `(base, tag)` never lose updates; order is
//!   arrival order.

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{LinkError, LinkResult};
pub use memory::InMemoryLinkIndex;
pub use traits::LinkIndex;
pub use types::Link;
