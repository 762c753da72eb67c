//! Rules for the negative directives: `noindex`, `nofollow`, `noarchive`.
//!
//! Precedence, by stage:
//!
//! ```text
//! Override    meta_qubit_force (true, ends the chain)
//!             meta_qubit_index (false, resume at Pagination)
//!             meta_qubit_default (false)
//! Site        globals_site
//! Context     globals_homepage | globals_taxonomy | globals_post_type_archive
//!             | globals_author | globals_date | globals_search | globals_post_type
//!             globals_taxonomy_post_types                        (terms only)
//! Pagination  empty_protection                                  (noindex only)
//!             home_paged_protection | paged_protection | cpage_protection
//! Protected   protected                                         (noindex only)
//! Integrity   query_protection                     (noindex and nofollow only)
//! ```

use super::predicates::{all_post_types_negative, guarded_page, is, is_archive, shows_single_post};
use crate::signals::Classification;
use crate::{DirectiveSet, DirectiveType, Emission, Qubit, Rule, SignalSource, Stage};

pub fn get() -> Vec<Rule> {
    vec![
        rule! {
            name: "meta_qubit",
            stage: Override,
            directives: DirectiveSet::NEGATIVE,
            check: meta_qubit,
        },
        rule! {
            name: "globals_site",
            stage: Site,
            directives: DirectiveSet::NEGATIVE,
            check: globals_site,
        },
        rule! {
            name: "globals_context",
            stage: Context,
            directives: DirectiveSet::NEGATIVE,
            check: globals_context,
        },
        rule! {
            name: "globals_taxonomy_post_types",
            stage: Context,
            directives: DirectiveSet::NEGATIVE,
            check: globals_taxonomy_post_types,
        },
        rule! {
            name: "empty_protection",
            stage: Pagination,
            directives: DirectiveSet::NOINDEX,
            check: empty_protection,
        },
        rule! {
            name: "home_paged_protection",
            stage: Pagination,
            directives: DirectiveSet::NOINDEX,
            check: home_paged_protection,
        },
        rule! {
            name: "paged_protection",
            stage: Pagination,
            directives: DirectiveSet::NOINDEX,
            check: paged_protection,
        },
        rule! {
            name: "cpage_protection",
            stage: Pagination,
            directives: DirectiveSet::NOINDEX,
            check: cpage_protection,
        },
        rule! {
            name: "protected",
            stage: Protected,
            directives: DirectiveSet::NOINDEX,
            check: protected,
        },
        rule! {
            name: "query_protection",
            stage: Integrity,
            directives: DirectiveSet::NOINDEX.union(DirectiveSet::NOFOLLOW),
            check: query_protection,
        },
    ]
}

fn meta_qubit(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    let emission = match source.get_override(directive) {
        Qubit::ForceDirective => Emission::flag("meta_qubit_force", true),
        Qubit::ForceIndexable => {
            Emission { resume_at: Some(Stage::Pagination), ..Emission::flag("meta_qubit_index", false) }
        }
        Qubit::NoOverride => Emission::flag("meta_qubit_default", false),
    };
    Some(emission)
}

fn globals_site(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    Some(Emission::flag("globals_site", source.site_wide_flag(directive)))
}

fn globals_context(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    let flags = source.context_flags(directive);
    let name = match flags.classification {
        Classification::Homepage => "globals_homepage",
        Classification::Term => "globals_taxonomy",
        Classification::PostTypeArchive => "globals_post_type_archive",
        Classification::Author => "globals_author",
        Classification::Date => "globals_date",
        Classification::Search => "globals_search",
        Classification::Singular => "globals_post_type",
        Classification::Unclassified => return None,
    };
    Some(Emission::flag(name, flags.setting))
}

fn globals_taxonomy_post_types(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    if !is(Classification::Term)(&source.context_flags(directive)) {
        return None;
    }
    let bound = source.taxonomy_bound_post_types();
    Some(Emission::flag("globals_taxonomy_post_types", all_post_types_negative(&bound, directive)))
}

fn empty_protection(source: &dyn SignalSource, _: DirectiveType) -> Option<Emission> {
    Some(Emission::flag("empty_protection", source.is_empty_view()))
}

fn home_paged_protection(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    let flags = source.context_flags(directive);
    is(Classification::Homepage)(&flags)
        .then(|| Emission::flag("home_paged_protection", guarded_page(&flags, source.is_paginated())))
}

fn paged_protection(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    let flags = source.context_flags(directive);
    is_archive(&flags).then(|| Emission::flag("paged_protection", guarded_page(&flags, source.is_paginated())))
}

fn cpage_protection(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    let flags = source.context_flags(directive);
    is(Classification::Singular)(&flags)
        .then(|| Emission::flag("cpage_protection", guarded_page(&flags, source.comment_page())))
}

fn protected(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    shows_single_post(&source.context_flags(directive)).then(|| Emission::flag("protected", source.is_protected()))
}

fn query_protection(source: &dyn SignalSource, _: DirectiveType) -> Option<Emission> {
    Some(Emission::flag("query_protection", source.is_malformed_request()))
}
