//! Signals for the request being served.
//!
//! Used when no entity is passed: the subject is whatever the host resolved
//! the current request to, as captured in a [`RequestContext`].

use super::{ContextFlags, PostTypeFlag, SignalSource, Subject, copyright_value};
use crate::config::SiteSettings;
use crate::integrity::find_exploit;
use crate::request::{RequestContext, View};
use crate::store::ContentStore;
use crate::{DirectiveType, Qubit};

pub struct Ambient<'a> {
    settings: &'a SiteSettings,
    store: &'a dyn ContentStore,
    request: &'a RequestContext,
    subject: Subject<'a>,
    malformed: bool,
}

impl<'a> Ambient<'a> {
    pub fn new(settings: &'a SiteSettings, store: &'a dyn ContentStore, request: &'a RequestContext) -> Self {
        let subject = match &request.view {
            View::FrontPage => {
                Subject::Homepage { page: settings.static_front_page.and_then(|id| store.post(id)) }
            }
            View::Singular { post } => {
                store.post(*post).map(|record| Subject::post(settings, *post, record)).unwrap_or(Subject::Unresolved)
            }
            View::Term { id, taxonomy } => store
                .term(taxonomy, *id)
                .map(|term| Subject::Term { taxonomy: taxonomy.as_str(), term })
                .unwrap_or(Subject::Unresolved),
            View::PostTypeArchive { post_type } => {
                Subject::PostTypeArchive { post_type: post_type.as_str(), record: store.post_type(post_type) }
            }
            View::Author { .. } => Subject::Author,
            View::Date => Subject::Date,
            View::Search => Subject::Search,
            View::NotFound | View::Other => Subject::Unresolved,
        };

        let malformed = match request.exploited {
            Some(verdict) => verdict,
            None if settings.advanced_query_protection => match find_exploit(&request.query) {
                Some(exploit) => {
                    tracing::debug!(var = %exploit.var, reason = exploit.reason, "malformed query variable");
                    true
                }
                None => false,
            },
            None => false,
        };

        Ambient { settings, store, request, subject, malformed }
    }
}

impl SignalSource for Ambient<'_> {
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
        self.request.paged()
    }

    // Comment pagination is only guarded on singular views.
    fn comment_page(&self) -> Option<u32> {
        match self.subject {
            Subject::Singular { .. } => self.request.comment_paged(),
            _ => None,
        }
    }

    fn is_empty_view(&self) -> bool {
        if self.request.view == View::NotFound {
            return true;
        }

        // A post split into pages: asking past the last one.
        if let Some(pages) = self.subject.page_count() {
            return self.request.page > pages;
        }

        let no_posts = self.request.found_posts == Some(0);
        match self.subject {
            // A blog homepage without posts is a new site, not an empty view.
            Subject::Homepage { .. } => no_posts && self.request.paged().is_some(),
            Subject::Term { term, .. } => no_posts || term.count == 0,
            Subject::PostTypeArchive { .. } | Subject::Author | Subject::Date | Subject::Search => no_posts,
            _ => false,
        }
    }

    fn is_protected(&self) -> bool {
        self.subject.is_protected()
    }

    fn is_malformed_request(&self) -> bool {
        self.malformed
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
