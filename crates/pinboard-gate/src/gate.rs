use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use pinboard_types::{Entry, EntryHeader, EntryId, Source};
use tracing::{debug, warn};

use crate::error::GateError;
use crate::rules::AppRules;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// The outcome of a gate evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The entry or link may be accepted.
    Accepted,
    /// The entry or link must not be accepted. Rejection is terminal for the
    /// item in question; there is no retry or partial acceptance.
    Rejected { reason: String },
}

impl Verdict {
    /// Returns `true` if the verdict is `Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Build a rejection with the given reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationGate
// ---------------------------------------------------------------------------

/// The validation gate: the only path by which entries and links become
/// visible, locally or via replication.
///
/// `validate_commit` and `validate_put` funnel into one shared evaluation of
/// the application's [`AppRules::validate_entry`], preserving the invariant
/// that local and replicated entries face the same rules. Evaluation is
/// fail-closed: a rule error or panic rejects, never accepts.
pub struct ValidationGate {
    rules: Arc<dyn AppRules>,
    joined: OnceLock<bool>,
}

impl ValidationGate {
    /// Create a gate around the application's rule set.
    pub fn new(rules: Arc<dyn AppRules>) -> Self {
        Self {
            rules,
            joined: OnceLock::new(),
        }
    }

    /// Gate for entries originated by the local participant, evaluated
    /// before they are published.
    pub fn validate_commit(
        &self,
        entry_type: &str,
        entry: &Entry,
        header: &EntryHeader,
        sources: &[Source],
    ) -> Verdict {
        self.evaluate_entry("commit", entry_type, entry, header, sources)
    }

    /// Gate for entries arriving from a remote participant, evaluated before
    /// they are accepted into the local store.
    pub fn validate_put(
        &self,
        entry_type: &str,
        entry: &Entry,
        header: &EntryHeader,
        sources: &[Source],
    ) -> Verdict {
        self.evaluate_entry("put", entry_type, entry, header, sources)
    }

    fn evaluate_entry(
        &self,
        gate: &str,
        entry_type: &str,
        entry: &Entry,
        header: &EntryHeader,
        sources: &[Source],
    ) -> Verdict {
        let verdict = self.fail_closed(gate, || {
            self.rules.validate_entry(entry_type, entry, header, sources)
        });
        if !verdict.is_accepted() {
            debug!(gate, entry_type, id = %header.entry_id.short(), "entry rejected");
        }
        verdict
    }

    /// Gate for link mutations, local or replicated.
    pub fn validate_link(
        &self,
        linking_entry_type: &str,
        base: &EntryId,
        target: &EntryId,
        tag: &str,
        sources: &[Source],
    ) -> Verdict {
        let verdict = self.fail_closed("link", || {
            self.rules
                .validate_link(linking_entry_type, base, target, tag, sources)
        });
        if !verdict.is_accepted() {
            debug!(base = %base.short(), target = %target.short(), tag, "link rejected");
        }
        verdict
    }

    /// One-time join gate.
    ///
    /// The rules are consulted exactly once per gate instance; the first
    /// answer is cached and returned on every later call, so the decision
    /// cannot flip after the participant has (or has not) joined.
    pub fn genesis(&self) -> bool {
        *self
            .joined
            .get_or_init(|| self.fail_closed("genesis", || self.rules.genesis()).is_accepted())
    }

    /// Run one rule evaluation with fail-closed semantics: `Ok(false)`,
    /// `Err`, and panics all reject.
    fn fail_closed<F>(&self, gate: &str, eval: F) -> Verdict
    where
        F: FnOnce() -> Result<bool, GateError>,
    {
        match catch_unwind(AssertUnwindSafe(eval)) {
            Ok(Ok(true)) => Verdict::Accepted,
            Ok(Ok(false)) => Verdict::rejected(format!("{gate} validation returned false")),
            Ok(Err(err)) => {
                warn!(gate, error = %err, "rule evaluation failed; rejecting");
                Verdict::rejected(format!("{gate} validation failed: {err}"))
            }
            Err(_) => {
                warn!(gate, "rule evaluation panicked; rejecting");
                Verdict::rejected(format!("{gate} validation panicked"))
            }
        }
    }
}

impl std::fmt::Debug for ValidationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationGate")
            .field("joined", &self.joined.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use serde_json::json;

    /// Rules that accept entries whose payload carries `"ok": true`.
    struct OkFlagRules;

    impl AppRules for OkFlagRules {
        fn validate_entry(
            &self,
            _entry_type: &str,
            entry: &Entry,
            _header: &EntryHeader,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            Ok(entry.payload.get("ok") == Some(&json!(true)))
        }

        fn validate_link(
            &self,
            _linking_entry_type: &str,
            _base: &EntryId,
            _target: &EntryId,
            tag: &str,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            Ok(!tag.is_empty())
        }
    }

    /// Rules whose entry predicate always errors.
    struct ErroringRules;

    impl AppRules for ErroringRules {
        fn validate_entry(
            &self,
            _entry_type: &str,
            _entry: &Entry,
            _header: &EntryHeader,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            Err(GateError::Rule("store unavailable".into()))
        }

        fn validate_link(
            &self,
            _linking_entry_type: &str,
            _base: &EntryId,
            _target: &EntryId,
            _tag: &str,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            Err(GateError::Rule("store unavailable".into()))
        }
    }

    /// Rules whose entry predicate panics.
    struct PanickingRules;

    impl AppRules for PanickingRules {
        fn validate_entry(
            &self,
            _entry_type: &str,
            _entry: &Entry,
            _header: &EntryHeader,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            panic!("bug in application rules");
        }

        fn validate_link(
            &self,
            _linking_entry_type: &str,
            _base: &EntryId,
            _target: &EntryId,
            _tag: &str,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            panic!("bug in application rules");
        }

        fn genesis(&self) -> Result<bool, GateError> {
            panic!("bug in application rules");
        }
    }

    /// Rules that count genesis evaluations.
    struct CountingRules {
        calls: AtomicUsize,
        answer: bool,
    }

    impl AppRules for CountingRules {
        fn genesis(&self) -> Result<bool, GateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }

        fn validate_entry(
            &self,
            _entry_type: &str,
            _entry: &Entry,
            _header: &EntryHeader,
            _sources: &[Source],
        ) -> Result<bool, GateError> {
            Ok(true)
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

    fn entry_and_header(payload: serde_json::Value) -> (Entry, EntryHeader) {
        let entry = Entry::new("post", payload);
        let id = entry.id().unwrap();
        let header = EntryHeader::new("post", id, Utc::now());
        (entry, header)
    }

    // -----------------------------------------------------------------------
    // Commit/put symmetry
    // -----------------------------------------------------------------------

    #[test]
    fn commit_and_put_agree_on_identical_inputs() {
        let gate = ValidationGate::new(Arc::new(OkFlagRules));

        for payload in [json!({"ok": true}), json!({"ok": false}), json!({})] {
            let (entry, header) = entry_and_header(payload);
            let commit = gate.validate_commit("post", &entry, &header, &[]);
            let put = gate.validate_put("post", &entry, &header, &[]);
            assert_eq!(commit.is_accepted(), put.is_accepted());
        }
    }

    #[test]
    fn accepting_and_rejecting_entries() {
        let gate = ValidationGate::new(Arc::new(OkFlagRules));

        let (entry, header) = entry_and_header(json!({"ok": true}));
        assert!(gate.validate_commit("post", &entry, &header, &[]).is_accepted());

        let (entry, header) = entry_and_header(json!({"ok": false}));
        let verdict = gate.validate_commit("post", &entry, &header, &[]);
        assert!(matches!(verdict, Verdict::Rejected { .. }));
    }

    // -----------------------------------------------------------------------
    // Fail-closed
    // -----------------------------------------------------------------------

    #[test]
    fn rule_error_rejects() {
        let gate = ValidationGate::new(Arc::new(ErroringRules));
        let (entry, header) = entry_and_header(json!({"ok": true}));

        let verdict = gate.validate_put("post", &entry, &header, &[]);
        match verdict {
            Verdict::Rejected { reason } => assert!(reason.contains("store unavailable")),
            Verdict::Accepted => panic!("fault must not accept"),
        }
    }

    #[test]
    fn rule_panic_rejects() {
        let gate = ValidationGate::new(Arc::new(PanickingRules));
        let (entry, header) = entry_and_header(json!({"ok": true}));

        assert!(!gate.validate_commit("post", &entry, &header, &[]).is_accepted());
        assert!(!gate
            .validate_link(
                "post",
                &EntryId::from_raw("base"),
                &EntryId::from_raw("target"),
                "post",
                &[]
            )
            .is_accepted());
        assert!(!gate.genesis());
    }

    // -----------------------------------------------------------------------
    // Link gate
    // -----------------------------------------------------------------------

    #[test]
    fn link_verdicts_follow_the_rules() {
        let gate = ValidationGate::new(Arc::new(OkFlagRules));
        let base = EntryId::from_raw("base");
        let target = EntryId::from_raw("target");

        assert!(gate.validate_link("post", &base, &target, "post", &[]).is_accepted());
        assert!(!gate.validate_link("post", &base, &target, "", &[]).is_accepted());
    }

    // -----------------------------------------------------------------------
    // Genesis
    // -----------------------------------------------------------------------

    #[test]
    fn genesis_is_evaluated_exactly_once() {
        let rules = Arc::new(CountingRules {
            calls: AtomicUsize::new(0),
            answer: true,
        });
        let gate = ValidationGate::new(Arc::clone(&rules) as Arc<dyn AppRules>);

        assert!(gate.genesis());
        assert!(gate.genesis());
        assert!(gate.genesis());
        assert_eq!(rules.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn genesis_refusal_is_permanent() {
        let rules = Arc::new(CountingRules {
            calls: AtomicUsize::new(0),
            answer: false,
        });
        let gate = ValidationGate::new(Arc::clone(&rules) as Arc<dyn AppRules>);

        assert!(!gate.genesis());
        assert!(!gate.genesis());
        assert_eq!(rules.calls.load(Ordering::SeqCst), 1);
    }
}
