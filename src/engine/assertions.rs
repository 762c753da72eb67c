//! Assertion recording.
//!
//! An assertion is one rule emission kept for diagnostics, so an end user can
//! be shown why a page ended up `noindex`. Recording is opt-in through
//! `ResolutionOptions::RECORD_ASSERTIONS`:
//!
//! - a cycle that records starts from a fresh, empty log;
//! - a cycle that does not record leaves the recorder as it was and allocates
//!   nothing.
//!
//! The recorder belongs to one `ResultAggregator`; concurrent resolutions each
//! own theirs.

use crate::{DirectiveType, RuleOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Emissions per directive, in the order the rules ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssertionLog {
    entries: BTreeMap<DirectiveType, Vec<RuleOutcome>>,
}

impl AssertionLog {
    /// Every emission recorded for `directive`; empty if none ran.
    pub fn get(&self, directive: DirectiveType) -> &[RuleOutcome] {
        self.entries.get(&directive).map(Vec::as_slice).unwrap_or_default()
    }

    /// The emission that decided `directive`: the last one, if it was
    /// decisive. `None` when the chain ran out without a decisive rule.
    pub fn decisive(&self, directive: DirectiveType) -> Option<&RuleOutcome> {
        self.get(directive).last().filter(|outcome| outcome.value.is_decisive())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DirectiveType, &[RuleOutcome])> {
        self.entries.iter().map(|(directive, outcomes)| (*directive, outcomes.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, directive: DirectiveType, outcomes: Vec<RuleOutcome>) {
        self.entries.insert(directive, outcomes);
    }
}

#[derive(Debug, Default)]
pub struct AssertionRecorder {
    log: Option<AssertionLog>,
}

impl AssertionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a resolution cycle. Returns whether this cycle records.
    pub(crate) fn begin(&mut self, recording: bool) -> bool {
        if recording {
            self.log = Some(AssertionLog::default());
        }
        recording
    }

    pub(crate) fn record(&mut self, directive: DirectiveType, outcomes: Vec<RuleOutcome>) {
        self.log.get_or_insert_with(AssertionLog::default).insert(directive, outcomes);
    }

    /// The log of the most recent recording cycle.
    pub fn log(&self) -> Option<&AssertionLog> {
        self.log.as_ref()
    }

    pub fn take(&mut self) -> Option<AssertionLog> {
        self.log.take()
    }
}
