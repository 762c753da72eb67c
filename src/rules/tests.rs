use crate::config::DirectiveFlags;
use crate::signals::{Classification, ContextFlags, PostTypeFlag, SignalSource};
use crate::{DirectiveSet, DirectiveType, Qubit, ResolutionOptions, ResultAggregator, SiteSettings, Value};
use crate::{MemoryStore, RuleOutcome};

/// Hand-set answers for every signal.
#[derive(Debug, Clone)]
struct Stub {
    qubit: Qubit,
    site: bool,
    context: ContextFlags,
    paged: Option<u32>,
    cpage: Option<u32>,
    empty: bool,
    protected: bool,
    malformed: bool,
    bound: Vec<PostTypeFlag>,
    copyright: bool,
    budget: i64,
}

impl Default for Stub {
    fn default() -> Self {
        Stub {
            qubit: Qubit::NoOverride,
            site: false,
            context: ContextFlags { classification: Classification::Singular, setting: false, paged_guard: false },
            paged: None,
            cpage: None,
            empty: false,
            protected: false,
            malformed: false,
            bound: Vec::new(),
            copyright: false,
            budget: 0,
        }
    }
}

impl SignalSource for Stub {
    fn get_override(&self, _: DirectiveType) -> Qubit {
        self.qubit
    }
    fn site_wide_flag(&self, _: DirectiveType) -> bool {
        self.site
    }
    fn context_flags(&self, directive: DirectiveType) -> ContextFlags {
        ContextFlags { paged_guard: self.context.paged_guard && directive == DirectiveType::Noindex, ..self.context }
    }
    fn is_paginated(&self) -> Option<u32> {
        self.paged
    }
    fn comment_page(&self) -> Option<u32> {
        self.cpage
    }
    fn is_empty_view(&self) -> bool {
        self.empty
    }
    fn is_protected(&self) -> bool {
        self.protected
    }
    fn is_malformed_request(&self) -> bool {
        self.malformed
    }
    fn taxonomy_bound_post_types(&self) -> Vec<PostTypeFlag> {
        self.bound.clone()
    }
    fn copyright_enabled(&self) -> bool {
        self.copyright
    }
    fn copyright_value(&self, _: DirectiveType) -> Option<i64> {
        self.copyright.then_some(self.budget)
    }
}

fn classified(classification: Classification) -> Stub {
    Stub { context: ContextFlags { classification, ..Stub::default().context }, ..Stub::default() }
}

/// Resolve `requested` against `stub`, recording, and return the map and log.
fn run(
    stub: &Stub,
    requested: DirectiveSet,
    options: ResolutionOptions,
) -> (crate::DirectiveMap, Vec<(DirectiveType, Vec<RuleOutcome>)>) {
    let (settings, store) = (SiteSettings::default(), MemoryStore::default());
    let mut aggregator = ResultAggregator::new(&settings, &store);
    let out = aggregator.resolve_from(stub, requested, options | ResolutionOptions::RECORD_ASSERTIONS);
    let log = aggregator
        .assertions()
        .map(|log| log.iter().map(|(d, outcomes)| (d, outcomes.to_vec())).collect())
        .unwrap_or_default();
    (out, log)
}

fn noindex(stub: &Stub, options: ResolutionOptions) -> (Value, Vec<String>) {
    let (out, log) = run(stub, DirectiveSet::NOINDEX, options);
    let names = log.into_iter().flat_map(|(_, outcomes)| outcomes).map(|o| o.rule_name).collect();
    (out[&DirectiveType::Noindex], names)
}

#[test]
fn scenario_a_nothing_applies() {
    let (value, names) = noindex(&Stub::default(), ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(false));
    assert_eq!(
        names,
        vec![
            "meta_qubit_default",
            "globals_site",
            "globals_post_type",
            "empty_protection",
            "cpage_protection",
            "protected",
            "query_protection"
        ]
    );
}

#[test]
fn scenario_b_protected_content_terminates() {
    let stub = Stub { protected: true, ..Stub::default() };
    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names.last().map(String::as_str), Some("protected"));
    assert!(!names.contains(&"query_protection".to_string()));
}

#[test]
fn scenario_c_force_directive_is_a_single_entry() {
    let stub = Stub { qubit: Qubit::from_raw(0.5), site: true, protected: true, malformed: true, ..Stub::default() };
    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names, vec!["meta_qubit_force"]);
}

#[test]
fn scenario_d_image_preview_budget() {
    let stub = Stub { copyright: true, budget: 120, ..Stub::default() };
    let (out, _) = run(&stub, DirectiveSet::MAX_IMAGE_PREVIEW, ResolutionOptions::empty());
    assert_eq!(out, crate::DirectiveMap::from([(DirectiveType::MaxImagePreview, Value::Int(120))]));
}

#[test]
fn copyright_switched_off_leaves_budget_absent() {
    let stub = Stub { budget: 120, ..Stub::default() };
    let (out, log) = run(&stub, DirectiveSet::MAX_SNIPPET | DirectiveSet::NOINDEX, ResolutionOptions::empty());
    assert!(!out.contains_key(&DirectiveType::MaxSnippet));
    assert!(out.contains_key(&DirectiveType::Noindex));
    assert!(log.iter().any(|(d, outcomes)| *d == DirectiveType::MaxSnippet && outcomes.is_empty()));
}

#[test]
fn force_directive_dominates_unless_overrides_are_ignored() {
    let stub = Stub { qubit: Qubit::ForceDirective, ..Stub::default() };
    assert_eq!(noindex(&stub, ResolutionOptions::empty()).0, Value::Bool(true));
    assert_eq!(noindex(&stub, ResolutionOptions::IGNORE_PROTECTIONS).0, Value::Bool(true));
    assert_eq!(noindex(&stub, ResolutionOptions::IGNORE_OVERRIDES).0, Value::Bool(false));
}

#[test]
fn force_indexable_bypasses_site_and_context() {
    let stub = Stub {
        qubit: Qubit::ForceIndexable,
        site: true,
        context: ContextFlags { setting: true, ..Stub::default().context },
        ..Stub::default()
    };

    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(false));
    assert_eq!(names, vec!["meta_qubit_index", "empty_protection", "cpage_protection", "protected", "query_protection"]);

    // Protections can still force it.
    let stub = Stub { empty: true, ..stub };
    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names, vec!["meta_qubit_index", "empty_protection"]);
}

#[test]
fn force_indexable_on_nofollow_keeps_query_protection() {
    let stub = Stub { qubit: Qubit::ForceIndexable, site: true, malformed: true, ..Stub::default() };
    let (out, log) = run(&stub, DirectiveSet::NOFOLLOW, ResolutionOptions::empty());
    assert_eq!(out[&DirectiveType::Nofollow], Value::Bool(true));
    let names: Vec<&str> = log[0].1.iter().map(|o| o.rule_name.as_str()).collect();
    assert_eq!(names, vec!["meta_qubit_index", "query_protection"]);
}

#[test]
fn malformed_request_survives_every_ignore_flag() {
    let stub = Stub { malformed: true, ..Stub::default() };
    let options = ResolutionOptions::IGNORE_OVERRIDES | ResolutionOptions::IGNORE_PROTECTIONS;
    let (out, _) = run(&stub, DirectiveSet::NEGATIVE, options);

    assert_eq!(out[&DirectiveType::Noindex], Value::Bool(true));
    assert_eq!(out[&DirectiveType::Nofollow], Value::Bool(true));
    assert_eq!(out[&DirectiveType::Noarchive], Value::Bool(false));
}

#[test]
fn ignoring_protections_skips_pagination_and_protected_stages() {
    let stub = Stub { empty: true, protected: true, ..Stub::default() };
    let (value, names) = noindex(&stub, ResolutionOptions::IGNORE_PROTECTIONS);
    assert_eq!(value, Value::Bool(false));
    assert_eq!(names, vec!["meta_qubit_default", "globals_site", "globals_post_type", "query_protection"]);
}

#[test]
fn first_true_rule_wins_and_later_rules_never_run() {
    let full = [
        "meta_qubit_default",
        "globals_site",
        "globals_post_type",
        "empty_protection",
        "cpage_protection",
        "protected",
        "query_protection",
    ];
    let with_guard = |stub: Stub| Stub { context: ContextFlags { paged_guard: true, ..stub.context }, ..stub };

    // (k, stub where rule k is the first to say true)
    let cases: Vec<(usize, Stub)> = vec![
        (2, Stub { site: true, malformed: true, ..Stub::default() }),
        (3, Stub { context: ContextFlags { setting: true, ..Stub::default().context }, protected: true, ..Stub::default() }),
        (4, Stub { empty: true, malformed: true, ..Stub::default() }),
        (5, with_guard(Stub { cpage: Some(2), protected: true, ..Stub::default() })),
        (6, Stub { protected: true, malformed: true, ..Stub::default() }),
        (7, Stub { malformed: true, ..Stub::default() }),
    ];

    for (k, stub) in cases {
        let (value, names) = noindex(&stub, ResolutionOptions::empty());
        assert_eq!(value, Value::Bool(true), "rule {k}");
        assert_eq!(names, full[..k].to_vec(), "rule {k}");
    }
}

#[test]
fn context_rule_matches_classification() {
    let cases = [
        (Classification::Homepage, "globals_homepage"),
        (Classification::Term, "globals_taxonomy"),
        (Classification::PostTypeArchive, "globals_post_type_archive"),
        (Classification::Author, "globals_author"),
        (Classification::Date, "globals_date"),
        (Classification::Search, "globals_search"),
        (Classification::Singular, "globals_post_type"),
    ];

    for (classification, rule) in cases {
        let mut stub = classified(classification);
        stub.context.setting = true;
        let (value, names) = noindex(&stub, ResolutionOptions::empty());
        assert_eq!(value, Value::Bool(true), "{rule}");
        assert_eq!(names.last().map(String::as_str), Some(rule));
    }

    let (value, names) = noindex(&classified(Classification::Unclassified), ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(false));
    assert_eq!(names, vec!["meta_qubit_default", "globals_site", "empty_protection", "query_protection"]);
}

#[test]
fn term_inherits_negativity_only_when_every_post_type_is_negative() {
    let negative = DirectiveFlags { noarchive: true, ..Default::default() };
    let bound = |flags: &[DirectiveFlags]| -> Vec<PostTypeFlag> {
        flags.iter().enumerate().map(|(i, f)| PostTypeFlag { post_type: format!("type{i}"), flags: *f }).collect()
    };

    let stub = Stub { bound: bound(&[negative, negative]), ..classified(Classification::Term) };
    let (out, log) = run(&stub, DirectiveSet::NOARCHIVE, ResolutionOptions::empty());
    assert_eq!(out[&DirectiveType::Noarchive], Value::Bool(true));
    assert_eq!(log[0].1.last().map(|o| o.rule_name.as_str()), Some("globals_taxonomy_post_types"));

    let stub = Stub { bound: bound(&[negative, DirectiveFlags::default()]), ..classified(Classification::Term) };
    let (out, _) = run(&stub, DirectiveSet::NOARCHIVE, ResolutionOptions::empty());
    assert_eq!(out[&DirectiveType::Noarchive], Value::Bool(false));

    let stub = classified(Classification::Term);
    let (out, _) = run(&stub, DirectiveSet::NOARCHIVE, ResolutionOptions::empty());
    assert_eq!(out[&DirectiveType::Noarchive], Value::Bool(false));
}

#[test]
fn pagination_guards_follow_classification() {
    let guarded = |classification: Classification| Stub {
        context: ContextFlags { classification, setting: false, paged_guard: true },
        paged: Some(2),
        cpage: Some(3),
        ..Stub::default()
    };

    let (value, names) = noindex(&guarded(Classification::Homepage), ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names.last().map(String::as_str), Some("home_paged_protection"));

    let (value, names) = noindex(&guarded(Classification::Date), ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names.last().map(String::as_str), Some("paged_protection"));

    let (value, names) = noindex(&guarded(Classification::Singular), ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(true));
    assert_eq!(names.last().map(String::as_str), Some("cpage_protection"));

    // Guard off: the rule runs and says false.
    let mut stub = guarded(Classification::Date);
    stub.context.paged_guard = false;
    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(false));
    assert!(names.contains(&"paged_protection".to_string()));
}

#[test]
fn protected_rule_only_covers_single_post_views() {
    let stub = Stub { protected: true, ..classified(Classification::Search) };
    let (value, names) = noindex(&stub, ResolutionOptions::empty());
    assert_eq!(value, Value::Bool(false));
    assert!(!names.contains(&"protected".to_string()));
}

#[test]
fn resolution_is_deterministic() {
    let stub = Stub { site: true, cpage: Some(4), copyright: true, budget: -1, ..Stub::default() };
    let first = run(&stub, DirectiveSet::all(), ResolutionOptions::empty());
    for _ in 0..5 {
        assert_eq!(run(&stub, DirectiveSet::all(), ResolutionOptions::empty()), first);
    }
}
