//! Result aggregation: the public entry point of the engine.
//!
//! ```text
//! resolve(requested, entity, options)
//!    │
//!    ├─ entity given?  Explicit source : Ambient source
//!    ├─ recorder.begin(RECORD_ASSERTIONS)
//!    └─ for each requested directive, in DirectiveType order:
//!           chain_for(d).run(source, options, trail?)
//!           Some(value) -> result[d] = value
//!           None        -> d absent (budget directive switched off)
//! ```
//!
//! An aggregator is built per request (or per resolution) and owns its
//! recorder. Resolving never mutates settings, content or the request, so
//! repeated calls with the same inputs give the same map.

use super::assertions::{AssertionLog, AssertionRecorder};
use super::registry::chain_for;
use crate::api::ResolutionOptions;
use crate::config::SiteSettings;
use crate::request::RequestContext;
use crate::signals::{Ambient, Explicit, SignalSource};
use crate::store::ContentStore;
use crate::{DirectiveSet, DirectiveType, EntityRef, Value};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Resolved directives. Budget directives that are switched off are absent.
pub type DirectiveMap = BTreeMap<DirectiveType, Value>;

static NO_REQUEST: Lazy<RequestContext> = Lazy::new(RequestContext::default);

pub struct ResultAggregator<'a> {
    settings: &'a SiteSettings,
    store: &'a dyn ContentStore,
    request: &'a RequestContext,
    recorder: AssertionRecorder,
}

impl<'a> ResultAggregator<'a> {
    /// An aggregator without a current request; ambient resolution then sees
    /// an unclassified view.
    pub fn new(settings: &'a SiteSettings, store: &'a dyn ContentStore) -> Self {
        ResultAggregator { settings, store, request: &NO_REQUEST, recorder: AssertionRecorder::new() }
    }

    /// Attach the request ambient resolution inspects.
    pub fn with_request(mut self, request: &'a RequestContext) -> Self {
        self.request = request;
        self
    }

    /// Resolve `requested` for `entity`, or for the current request when no
    /// entity is given.
    pub fn resolve(
        &mut self,
        requested: DirectiveSet,
        entity: Option<&EntityRef>,
        options: ResolutionOptions,
    ) -> DirectiveMap {
        match entity {
            Some(entity) => {
                let source = Explicit::new(self.settings, self.store, entity);
                self.resolve_from(&source, requested, options)
            }
            None => {
                let source = Ambient::new(self.settings, self.store, self.request);
                self.resolve_from(&source, requested, options)
            }
        }
    }

    /// Resolve against a caller-provided signal source.
    pub fn resolve_from(
        &mut self,
        source: &dyn SignalSource,
        requested: DirectiveSet,
        options: ResolutionOptions,
    ) -> DirectiveMap {
        let recording = self.recorder.begin(options.contains(ResolutionOptions::RECORD_ASSERTIONS));
        let mut directives = DirectiveMap::new();

        for directive in requested.types() {
            let chain = chain_for(directive);
            let value = if recording {
                let mut trail = Vec::new();
                let value = chain.run(source, options, Some(&mut trail));
                self.recorder.record(directive, trail);
                value
            } else {
                chain.run(source, options, None)
            };

            match value {
                Some(value) => {
                    directives.insert(directive, value);
                }
                None => tracing::trace!(directive = %directive, "no value; directive omitted"),
            }
        }

        directives
    }

    /// The assertion log of the most recent recording cycle.
    pub fn assertions(&self) -> Option<&AssertionLog> {
        self.recorder.log()
    }

    pub fn take_assertions(&mut self) -> Option<AssertionLog> {
        self.recorder.take()
    }
}
