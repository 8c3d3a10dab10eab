use std::sync::Arc;

use chrono::Utc;
use pinboard_gate::{AppRules, ValidationGate, Verdict};
use pinboard_links::{InMemoryLinkIndex, LinkIndex};
use pinboard_store::{EntryStore, InMemoryEntryStore};
use pinboard_types::{Entry, EntryHeader, EntryId, Source};
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::model::{
    Post, PostRules, CARD_POST_TAG, MANIFEST_ENTRY_TYPE, POST_ENTRY_TYPE, ROOT_REGISTRY_TAG,
};

/// One participant's view of a pinboard application.
///
/// Owns the content store, the link index, the validation gate, and the
/// board root: the content-derived id of the application manifest committed
/// at initialization. Every participant initialized from the same manifest
/// derives the same root.
pub struct Board {
    store: Arc<InMemoryEntryStore>,
    links: InMemoryLinkIndex,
    gate: ValidationGate,
    root: EntryId,
    agent: Source,
}

impl Board {
    /// Initialize a board with the card application's standard rules.
    pub fn new(manifest: Value, agent: Source) -> AppResult<Self> {
        Self::with_rules(manifest, agent, Arc::new(PostRules))
    }

    /// Initialize a board with a custom rule set.
    pub fn with_rules(
        manifest: Value,
        agent: Source,
        rules: Arc<dyn AppRules>,
    ) -> AppResult<Self> {
        let store = Arc::new(InMemoryEntryStore::new());
        let links = InMemoryLinkIndex::new(Arc::clone(&store) as Arc<dyn EntryStore>);
        let gate = ValidationGate::new(rules);

        // The manifest is the root entry; its content hash is the board root.
        let root = store.commit(MANIFEST_ENTRY_TYPE, manifest)?;
        store.put(&root)?;
        debug!(root = %root.short(), agent = %agent, "board initialized");

        Ok(Self {
            store,
            links,
            gate,
            root,
            agent,
        })
    }

    /// The board root id.
    pub fn root(&self) -> &EntryId {
        &self.root
    }

    /// Handle to the underlying content store, for host-level commits and
    /// reads outside the composed operations.
    pub fn store(&self) -> Arc<dyn EntryStore> {
        Arc::clone(&self.store) as Arc<dyn EntryStore>
    }

    // ---------------------------------------------------------------------
    // Lifecycle hooks (invoked by the host, once each per event)
    // ---------------------------------------------------------------------

    /// One-time join gate. Evaluated once; later calls return the cached
    /// answer. A participant refused here never participates.
    pub fn genesis(&self) -> bool {
        self.gate.genesis()
    }

    /// Admit an entry replicated from a remote participant: validate on the
    /// put side, then commit and publish it locally.
    pub fn accept_entry(
        &self,
        entry_type: &str,
        payload: Value,
        sources: &[Source],
    ) -> AppResult<EntryId> {
        let entry = Entry::new(entry_type, payload);
        let id = entry.id()?;
        let header = EntryHeader::new(entry_type, id, Utc::now());

        match self.gate.validate_put(entry_type, &entry, &header, sources) {
            Verdict::Rejected { reason } => Err(AppError::Rejected { reason }),
            Verdict::Accepted => {
                let id = self.store.commit(entry_type, entry.payload)?;
                self.store.put(&id)?;
                Ok(id)
            }
        }
    }

    /// Admit a link mutation replicated from a remote participant: validate,
    /// then attach.
    pub fn accept_link(
        &self,
        linking_entry_type: &str,
        base: &EntryId,
        target: EntryId,
        tag: &str,
        sources: &[Source],
    ) -> AppResult<()> {
        match self
            .gate
            .validate_link(linking_entry_type, base, &target, tag, sources)
        {
            Verdict::Rejected { reason } => Err(AppError::Rejected { reason }),
            Verdict::Accepted => {
                self.links.attach(base, target, tag)?;
                Ok(())
            }
        }
    }

    // ---------------------------------------------------------------------
    // Exposed operations
    // ---------------------------------------------------------------------

    /// Create a new card: commit its first post and link it under the
    /// card's declared base. Returns the new entry id.
    pub fn new_card(&self, card: Post) -> AppResult<EntryId> {
        self.commit_post(card)
    }

    /// Post to an already established card.
    ///
    /// Same operation as [`Board::new_card`]; the two public names are kept
    /// because callers distinguish the workflows even though the core does
    /// not.
    pub fn post_to_card(&self, card: Post) -> AppResult<EntryId> {
        self.commit_post(card)
    }

    fn commit_post(&self, mut card: Post) -> AppResult<EntryId> {
        // Server-assigned fields: never trust what the client sent.
        card.id = None;
        let now = Utc::now();
        card.update_timestamp = Some(now);

        let payload =
            serde_json::to_value(&card).map_err(|e| AppError::Serialization(e.to_string()))?;
        let entry = Entry::new(POST_ENTRY_TYPE, payload);
        let id = entry.id()?;
        let header = EntryHeader::new(POST_ENTRY_TYPE, id, now);

        let sources = [self.agent.clone()];
        match self
            .gate
            .validate_commit(POST_ENTRY_TYPE, &entry, &header, &sources)
        {
            Verdict::Rejected { reason } => return Err(AppError::Rejected { reason }),
            Verdict::Accepted => {}
        }

        // The link gate covers local mutations too; run it before anything
        // becomes visible so a rejected link leaves no partial state.
        match self.gate.validate_link(
            POST_ENTRY_TYPE,
            &card.post,
            &header.entry_id,
            CARD_POST_TAG,
            &sources,
        ) {
            Verdict::Rejected { reason } => return Err(AppError::Rejected { reason }),
            Verdict::Accepted => {}
        }

        let id = self.store.commit(POST_ENTRY_TYPE, entry.payload)?;
        self.store.put(&id)?;
        self.links.attach(&card.post, id.clone(), CARD_POST_TAG)?;
        Ok(id)
    }

    /// All posts attached to a card, in posting order.
    ///
    /// Listing is best-effort: a link-query failure degrades to an empty
    /// list. A stored payload that no longer matches the post schema is a
    /// serialization error, not a silently skipped post.
    pub fn list_posts(&self, card_base: &EntryId) -> AppResult<Vec<Post>> {
        let loaded = match self.links.query_loaded(card_base, CARD_POST_TAG) {
            Ok(loaded) => loaded,
            Err(err) => {
                debug!(base = %card_base.short(), error = %err, "list_posts degraded to empty");
                return Ok(Vec::new());
            }
        };
        loaded
            .into_iter()
            .map(|(id, entry)| Post::from_entry(id, &entry))
            .collect()
    }

    /// Everything registered under the board root, in registration order.
    ///
    /// Targets are returned unresolved: member registrations are raw agent
    /// ids that name no entry. Best-effort like [`Board::list_posts`].
    pub fn list_cards(&self) -> AppResult<Vec<EntryId>> {
        match self.links.query(&self.root, ROOT_REGISTRY_TAG) {
            Ok(ids) => Ok(ids),
            Err(err) => {
                debug!(error = %err, "list_cards degraded to empty");
                Ok(Vec::new())
            }
        }
    }

    /// Register a participant under the board root.
    ///
    /// No validation runs on this path beyond the link index's own base
    /// check.
    pub fn add_member(&self, agent_id: &str) -> AppResult<()> {
        self.links
            .attach(&self.root, EntryId::from_raw(agent_id), ROOT_REGISTRY_TAG)?;
        Ok(())
    }

    /// Boundary alias for [`Board::add_member`]: the host exposes the
    /// registration operation to clients under this name.
    pub fn add_card(&self, agent_id: &str) -> AppResult<()> {
        self.add_member(agent_id)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("root", &self.root)
            .field("agent", &self.agent)
            .finish()
    }
}
