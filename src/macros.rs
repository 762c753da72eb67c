/// Lazily compiled static regex; the pattern is a literal so compilation
/// cannot fail at runtime.
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("static regex literal"));
        &*RE
    }};
}

/// Declare a chain rule.
///
/// ```text
/// rule! {
///     name: "globals_site",
///     stage: Site,
///     directives: DirectiveSet::NEGATIVE,
///     check: |source, directive| Some(Emission::flag("globals_site", source.site_wide_flag(directive))),
/// }
/// ```
macro_rules! rule {
    (
        name: $name:expr,
        stage: $stage:ident,
        directives: $directives:expr,
        check: $check:expr
        $(,)?
    ) => {{
        $crate::Rule { name: $name, stage: $crate::Stage::$stage, directives: $directives, check: $check }
    }};
}
