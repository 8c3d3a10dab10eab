//! Foundation types for Pinboard.
//!
//! This crate provides the data model shared by every other Pinboard crate:
//!
//! - [`Entry`] — an immutable, typed record (`entry_type` + JSON payload)
//! - [`EntryId`] — opaque identifier; canonically the domain-separated BLAKE3
//!   hash of an entry's content, but any string a peer hands us is a valid id
//! - [`EntryHeader`] — per-entry metadata passed to validation
//! - [`Source`] — opaque reference to the participant presenting an entry
//!
//! Identity is referentially transparent: an [`EntryId`] computed from an
//! entry's content is a pure function of `(entry_type, payload)`, so two
//! participants committing identical content always agree on the id.

pub mod entry;
pub mod error;
pub mod header;

pub use entry::{Entry, EntryId};
pub use error::TypeError;
pub use header::{EntryHeader, Source};
