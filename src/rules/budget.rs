//! Crawler-budget rules: `max_snippet`, `max_image_preview`,
//! `max_video_preview`.
//!
//! One rule per directive. With copyright directives switched off nothing is
//! emitted, so the directive is left out of the result rather than set to 0.

use crate::{DirectiveSet, DirectiveType, Emission, Rule, SignalSource, Value};

pub fn get() -> Vec<Rule> {
    vec![rule! {
        name: "globals_copyright",
        stage: Budget,
        directives: DirectiveSet::BUDGET,
        check: globals_copyright,
    }]
}

fn globals_copyright(source: &dyn SignalSource, directive: DirectiveType) -> Option<Emission> {
    if !source.copyright_enabled() {
        return None;
    }
    source.copyright_value(directive).map(|value| Emission::new("globals_copyright", Value::Int(value)))
}
