//! Signals for an explicitly referenced entity.
//!
//! Used when the caller names the subject, e.g. when showing the directives a
//! specific post will get. An explicit reference is always "page one": it is
//! never paginated, never a 404 and never a malformed request.

use super::{ContextFlags, PostTypeFlag, SignalSource, Subject, copyright_value};
use crate::config::SiteSettings;
use crate::store::ContentStore;
use crate::{DirectiveType, EntityRef, Qubit};

pub struct Explicit<'a> {
    settings: &'a SiteSettings,
    store: &'a dyn ContentStore,
    subject: Subject<'a>,
}

impl<'a> Explicit<'a> {
    pub fn new(settings: &'a SiteSettings, store: &'a dyn ContentStore, entity: &'a EntityRef) -> Self {
        let subject = match entity {
            EntityRef::Post(id) => store.post(*id).map(|post| Subject::post(settings, *id, post)),
            EntityRef::Term { id, taxonomy } => {
                store.term(taxonomy, *id).map(|term| Subject::Term { taxonomy: taxonomy.as_str(), term })
            }
            EntityRef::PostTypeArchive(post_type) => store
                .post_type(post_type)
                .filter(|record| record.has_archive)
                .map(|record| Subject::PostTypeArchive { post_type: post_type.as_str(), record: Some(record) }),
        };

        if subject.is_none() {
            tracing::debug!(entity = %entity, "entity did not resolve; answering neutrally");
        }

        Explicit { settings, store, subject: subject.unwrap_or(Subject::Unresolved) }
    }
}

impl SignalSource for Explicit<'_> {
    fn get_override(&self, directive: DirectiveType) -> Qubit {
        self.subject.qubit(directive)
    }

    fn site_wide_flag(&self, directive: DirectiveType) -> bool {
        self.settings.site.get(directive)
    }

    fn context_flags(&self, directive: DirectiveType) -> ContextFlags {
        self.subject.context_flags(self.settings, directive)
    }

    fn is_paginated(&self) -> Option<u32> {
        None
    }

    fn comment_page(&self) -> Option<u32> {
        None
    }

    // Only an empty term is known to render an empty archive.
    fn is_empty_view(&self) -> bool {
        matches!(self.subject, Subject::Term { term, .. } if term.count == 0)
    }

    fn is_protected(&self) -> bool {
        self.subject.is_protected()
    }

    fn is_malformed_request(&self) -> bool {
        false
    }

    fn taxonomy_bound_post_types(&self) -> Vec<PostTypeFlag> {
        self.subject.bound_post_types(self.settings, self.store)
    }

    fn copyright_enabled(&self) -> bool {
        self.settings.set_copyright_directives
    }

    fn copyright_value(&self, directive: DirectiveType) -> Option<i64> {
        copyright_value(self.settings, directive)
    }
}
