use crate::config::SiteSnapshot;
use crate::engine::{self, AssertionLog, DirectiveMap, ResultAggregator};
use crate::{DirectiveSet, DirectiveType, EntityRef};
use std::time::{Duration, Instant};

bitflags::bitflags! {
    /// Switches that change how a resolution runs. They compose freely.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResolutionOptions: u8 {
        /// Skip per-item overrides.
        const IGNORE_OVERRIDES   = 1 << 0;
        /// Skip pagination, emptiness and protected-content rules. Query
        /// protection still runs.
        const IGNORE_PROTECTIONS = 1 << 1;
        /// Keep a trail of every rule that fired.
        const RECORD_ASSERTIONS  = 1 << 2;
    }
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        ResolutionOptions::empty()
    }
}

/// Result from [`resolve_verbose_with`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub directives: DirectiveMap,
    /// Rules that fired, per directive.
    pub assertions: AssertionLog,
    /// Time spent resolving.
    pub elapsed: Duration,
}

/// Resolve `requested` for `entity` (or the snapshot's request when `None`)
/// against a loaded snapshot.
///
/// # Example
/// ```
/// use metarobots::{DirectiveSet, DirectiveType, EntityRef, ResolutionOptions, SiteSnapshot, Value, resolve_with};
///
/// let snapshot = SiteSnapshot::default();
/// let out = resolve_with(&snapshot, DirectiveSet::NOINDEX, Some(&EntityRef::Post(1)), ResolutionOptions::empty());
/// assert_eq!(out[&DirectiveType::Noindex], Value::Bool(false));
/// ```
pub fn resolve_with(
    snapshot: &SiteSnapshot,
    requested: DirectiveSet,
    entity: Option<&EntityRef>,
    options: ResolutionOptions,
) -> DirectiveMap {
    ResultAggregator::new(&snapshot.settings, &snapshot.content).with_request(&snapshot.request).resolve(
        requested,
        entity,
        options,
    )
}

/// Like [`resolve_with`], but always records assertions and returns them with
/// the directives. The plain path does not allocate the trail.
pub fn resolve_verbose_with(
    snapshot: &SiteSnapshot,
    requested: DirectiveSet,
    entity: Option<&EntityRef>,
    options: ResolutionOptions,
) -> Resolution {
    let start = Instant::now();
    let mut aggregator = ResultAggregator::new(&snapshot.settings, &snapshot.content).with_request(&snapshot.request);
    let directives = aggregator.resolve(requested, entity, options | ResolutionOptions::RECORD_ASSERTIONS);
    let assertions = aggregator.take_assertions().unwrap_or_default();

    Resolution { directives, assertions, elapsed: start.elapsed() }
}

/// Names of the rules serving `directive`, in evaluation order.
pub fn rule_names(directive: DirectiveType) -> Vec<&'static str> {
    engine::chain_for(directive).rule_names()
}
