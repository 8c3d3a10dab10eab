use chrono::{DateTime, Utc};
use pinboard_gate::{AppRules, GateError};
use pinboard_types::{Entry, EntryHeader, EntryId, Source};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Entry type for posts.
pub const POST_ENTRY_TYPE: &str = "post";

/// Entry type for the application manifest committed at board init.
pub const MANIFEST_ENTRY_TYPE: &str = "%manifest";

/// Tag linking a post to its owning card base.
pub const CARD_POST_TAG: &str = "post";

/// Tag for the registry under the board root: cards and members alike.
///
/// Registration and listing share this one constant; the register-then-list
/// property only holds when both sides agree on the tag.
pub const ROOT_REGISTRY_TAG: &str = "posts";

/// A post: the payload of every `"post"` entry.
///
/// `id` is never part of the committed payload; listing attaches the entry's
/// own id before handing posts back. `updateTimestamp` is stamped by the
/// committing side, not supplied by clients.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// The entry's id, attached when listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    /// The owning card's base id.
    pub post: EntryId,
    /// Display name.
    pub name: String,
    /// Free-form content.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub body: Value,
    /// Server-assigned commit timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_timestamp: Option<DateTime<Utc>>,
}

impl Post {
    /// Create a post destined for the given card base.
    pub fn new(post: EntryId, name: impl Into<String>) -> Self {
        Self {
            id: None,
            post,
            name: name.into(),
            body: Value::Null,
            update_timestamp: None,
        }
    }

    /// Free-form content builder.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Decode a stored entry into a post, attaching the entry's own id.
    ///
    /// Fails closed: a payload that does not match the schema is a
    /// serialization error, never a partially populated post.
    pub fn from_entry(id: EntryId, entry: &Entry) -> AppResult<Self> {
        let mut post: Post = serde_json::from_value(entry.payload.clone())
            .map_err(|e| AppError::Serialization(format!("malformed post payload: {e}")))?;
        post.id = Some(id);
        Ok(post)
    }
}

/// Rule set for the card application.
///
/// A `"post"` entry is valid iff its payload decodes against the [`Post`]
/// schema; the manifest validates trivially; entry types the application
/// does not define are rejected. All decisions are read-only.
pub struct PostRules;

impl AppRules for PostRules {
    fn validate_entry(
        &self,
        entry_type: &str,
        entry: &Entry,
        _header: &EntryHeader,
        _sources: &[Source],
    ) -> Result<bool, GateError> {
        match entry_type {
            POST_ENTRY_TYPE => {
                Ok(serde_json::from_value::<Post>(entry.payload.clone()).is_ok())
            }
            MANIFEST_ENTRY_TYPE => Ok(true),
            _ => Ok(false),
        }
    }

    fn validate_link(
        &self,
        _linking_entry_type: &str,
        _base: &EntryId,
        _target: &EntryId,
        _tag: &str,
        _sources: &[Source],
    ) -> Result<bool, GateError> {
        Ok(true)
    }
}
