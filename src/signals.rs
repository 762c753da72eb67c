//! Signal sources.
//!
//! Rule chains never look at settings, content or the request directly. They
//! ask a [`SignalSource`] questions ("what is the per-item override?", "is
//! this a paginated view?") and stay unaware of whether the subject was passed
//! in explicitly or derived from the request being served.
//!
//! ```text
//!                 ┌── Explicit  (EntityRef + ContentStore + SiteSettings)
//! SignalSource ───┤
//!                 └── Ambient   (RequestContext + ContentStore + SiteSettings)
//! ```
//!
//! Both sources first reduce their input to a [`Subject`], the shared
//! classification of "what is being resolved". Most answers derive from the
//! subject alone; only pagination, emptiness and request integrity differ
//! between the two.
//!
//! ## Neutral answers
//!
//! A reference that resolves to nothing (deleted post, unknown taxonomy, post
//! type without an archive) becomes [`Subject::Unresolved`]. Every
//! entity-derived answer is then neutral: `NoOverride`, `Unclassified`,
//! `false`, `None` or empty. Configuration-only answers (the site-wide flag,
//! copyright values) do not depend on the subject and are still served.

#[path = "signals/ambient.rs"]
mod ambient;
#[path = "signals/explicit.rs"]
mod explicit;

pub use ambient::Ambient;
pub use explicit::Explicit;

use crate::config::{DirectiveFlags, SiteSettings};
use crate::store::{ContentStore, PostRecord, PostTypeRecord, TermRecord};
use crate::{DirectiveType, Qubit};

/// Everything a rule chain may ask about the subject being resolved.
pub trait SignalSource {
    /// Per-item override for `directive`.
    fn get_override(&self, directive: DirectiveType) -> Qubit;
    /// `site_<directive>`.
    fn site_wide_flag(&self, directive: DirectiveType) -> bool;
    /// Classification plus the settings that apply to it.
    fn context_flags(&self, directive: DirectiveType) -> ContextFlags;
    /// Page number when beyond the first page.
    fn is_paginated(&self) -> Option<u32>;
    /// Comment page number of a singular view, when beyond the first.
    fn comment_page(&self) -> Option<u32>;
    /// 404, out-of-range pagination or an archive without posts.
    fn is_empty_view(&self) -> bool;
    /// Password-protected or private.
    fn is_protected(&self) -> bool;
    fn is_malformed_request(&self) -> bool;
    /// Post types bound to the subject's taxonomy, with their flags. Empty
    /// unless the subject is a term.
    fn taxonomy_bound_post_types(&self) -> Vec<PostTypeFlag>;
    /// Whether crawler-budget directives are emitted at all.
    fn copyright_enabled(&self) -> bool;
    fn copyright_value(&self, directive: DirectiveType) -> Option<i64>;
}

/// Coarse kind of the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Homepage,
    Term,
    PostTypeArchive,
    Author,
    Date,
    Search,
    Singular,
    Unclassified,
}

impl Classification {
    /// Archive-like views, subject to the paged-archive guard.
    pub fn is_archive(self) -> bool {
        matches!(
            self,
            Classification::Term
                | Classification::PostTypeArchive
                | Classification::Author
                | Classification::Date
                | Classification::Search
        )
    }

    /// Views that show a single post (including a static front page).
    pub fn is_singular_like(self) -> bool {
        matches!(self, Classification::Singular | Classification::Homepage)
    }
}

/// The classification and the settings that apply to it, for one directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextFlags {
    pub classification: Classification,
    /// The site-wide sub-setting for this classification, e.g. `search.noindex`
    /// for a search page or the post type's flag for a singular view.
    pub setting: bool,
    /// The pagination guard option for this classification: home-paged,
    /// paged-archive or comment-paged. Only ever set for `Noindex`.
    pub paged_guard: bool,
}

impl ContextFlags {
    pub const NEUTRAL: ContextFlags =
        ContextFlags { classification: Classification::Unclassified, setting: false, paged_guard: false };
}

/// A post type bound to a taxonomy, with its directive flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTypeFlag {
    pub post_type: String,
    pub flags: DirectiveFlags,
}

/// What is being resolved, after looking references up.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Subject<'a> {
    /// The front page; `page` is the static page shown on it, if any.
    Homepage { page: Option<&'a PostRecord> },
    Singular { post: &'a PostRecord },
    Term { taxonomy: &'a str, term: &'a TermRecord },
    PostTypeArchive { post_type: &'a str, record: Option<&'a PostTypeRecord> },
    Author,
    Date,
    Search,
    Unresolved,
}

impl<'a> Subject<'a> {
    /// A post, which is the homepage when it is the static front page.
    pub(crate) fn post(settings: &SiteSettings, id: u64, post: &'a PostRecord) -> Self {
        if settings.is_static_front_page(id) { Subject::Homepage { page: Some(post) } } else { Subject::Singular { post } }
    }

    pub(crate) fn qubit(&self, directive: DirectiveType) -> Qubit {
        match self {
            Subject::Homepage { page: Some(post) } | Subject::Singular { post } => post.robots.qubit(directive),
            Subject::Term { term, .. } => term.robots.qubit(directive),
            Subject::PostTypeArchive { record: Some(record), .. } => record.robots.qubit(directive),
            _ => Qubit::NoOverride,
        }
    }

    pub(crate) fn context_flags(&self, settings: &SiteSettings, directive: DirectiveType) -> ContextFlags {
        let noindex = directive == DirectiveType::Noindex;
        let (classification, setting, paged_guard) = match self {
            Subject::Homepage { .. } => {
                (Classification::Homepage, settings.homepage.get(directive), settings.home_paged_noindex)
            }
            Subject::Singular { post } => (
                Classification::Singular,
                settings.post_type_flags(&post.post_type).get(directive),
                settings.comment_paged_noindex,
            ),
            Subject::Term { taxonomy, .. } => {
                (Classification::Term, settings.taxonomy_flags(taxonomy).get(directive), settings.paged_noindex)
            }
            Subject::PostTypeArchive { post_type, .. } => (
                Classification::PostTypeArchive,
                settings.post_type_flags(post_type).get(directive),
                settings.paged_noindex,
            ),
            Subject::Author => (Classification::Author, settings.author.get(directive), settings.paged_noindex),
            Subject::Date => (Classification::Date, settings.date.get(directive), settings.paged_noindex),
            Subject::Search => (Classification::Search, settings.search.get(directive), settings.paged_noindex),
            Subject::Unresolved => return ContextFlags::NEUTRAL,
        };

        ContextFlags { classification, setting, paged_guard: noindex && paged_guard }
    }

    pub(crate) fn is_protected(&self) -> bool {
        match self {
            Subject::Homepage { page: Some(post) } | Subject::Singular { post } => post.is_protected(),
            _ => false,
        }
    }

    /// Content pages of the post shown, if the subject shows one.
    pub(crate) fn page_count(&self) -> Option<u32> {
        match self {
            Subject::Homepage { page: Some(post) } | Subject::Singular { post } => Some(post.page_count()),
            _ => None,
        }
    }

    pub(crate) fn bound_post_types(&self, settings: &SiteSettings, store: &dyn ContentStore) -> Vec<PostTypeFlag> {
        let Subject::Term { taxonomy, .. } = self else {
            return Vec::new();
        };

        store
            .taxonomy_post_types(taxonomy)
            .unwrap_or_default()
            .iter()
            .map(|post_type| PostTypeFlag { post_type: post_type.clone(), flags: settings.post_type_flags(post_type) })
            .collect()
    }
}

/// Copyright answers shared by both sources; they only depend on settings.
pub(crate) fn copyright_value(settings: &SiteSettings, directive: DirectiveType) -> Option<i64> {
    if settings.set_copyright_directives { settings.copyright_value(directive) } else { None }
}
