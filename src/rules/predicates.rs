use crate::signals::{Classification, ContextFlags, PostTypeFlag};
use crate::DirectiveType;

/// Returns true when every bound post type is already negative for
/// `directive`. An unbound taxonomy never inherits anything.
pub fn all_post_types_negative(bound: &[PostTypeFlag], directive: DirectiveType) -> bool {
    !bound.is_empty() && bound.iter().all(|pt| pt.flags.get(directive))
}

/// Returns true when the guard option is on and the view is beyond page one.
pub fn guarded_page(flags: &ContextFlags, page: Option<u32>) -> bool {
    flags.paged_guard && page.is_some_and(|p| p > 1)
}

/// Returns true for the classifications the protected-content rule covers.
pub fn shows_single_post(flags: &ContextFlags) -> bool {
    flags.classification.is_singular_like()
}

/// Returns true for archive-like classifications.
pub fn is_archive(flags: &ContextFlags) -> bool {
    flags.classification.is_archive()
}

pub fn is(classification: Classification) -> impl Fn(&ContextFlags) -> bool {
    move |flags| flags.classification == classification
}
