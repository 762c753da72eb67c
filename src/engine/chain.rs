//! Rule chain evaluation.
//!
//! A chain is the ordered list of rules serving one directive. Evaluation is a
//! plain loop:
//!
//! ```text
//! for rule in chain (ordered by Stage):
//!     stage disabled by options?       -> skip
//!     before a pending resume stage?   -> skip
//!     check(source, directive)
//!         None                         -> rule does not apply, not recorded
//!         Some(emission)               -> record
//!             decisive value           -> return it
//!             resume_at                -> skip ahead to that stage
//! exhausted: negative directive -> false, budget directive -> absent
//! ```
//!
//! For negative directives this is an OR over the rules in order, stopping at
//! the first `true`. A `ForceDirective` override is simply the first rule
//! emitting `true`, so it also suppresses every protection stage.
//!
//! ## Stage gating
//!
//! - `Override` is skipped with `IGNORE_OVERRIDES`.
//! - `Pagination` and `Protected` are skipped with `IGNORE_PROTECTIONS`.
//! - `Integrity` always runs.

use crate::api::ResolutionOptions;
use crate::{DirectiveType, Rule, RuleOutcome, SignalSource, Stage, Value};

impl Stage {
    fn is_enabled(self, options: ResolutionOptions) -> bool {
        match self {
            Stage::Override => !options.contains(ResolutionOptions::IGNORE_OVERRIDES),
            Stage::Pagination | Stage::Protected => !options.contains(ResolutionOptions::IGNORE_PROTECTIONS),
            Stage::Site | Stage::Context | Stage::Integrity | Stage::Budget => true,
        }
    }
}

/// The rules serving one directive, in evaluation order.
#[derive(Debug)]
pub(crate) struct RuleChain {
    directive: DirectiveType,
    rules: Vec<&'static Rule>,
}

impl RuleChain {
    /// Select the rules serving `directive` and order them by stage. The sort
    /// is stable, so declaration order is kept within a stage.
    pub(crate) fn new(directive: DirectiveType, rules: &'static [Rule]) -> Self {
        let mut rules: Vec<&Rule> = rules.iter().filter(|r| r.directives.contains(directive.flag())).collect();
        rules.sort_by_key(|r| r.stage);
        RuleChain { directive, rules }
    }

    pub(crate) fn directive(&self) -> DirectiveType {
        self.directive
    }

    pub(crate) fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Evaluate the chain against `source`.
    ///
    /// When `trail` is given, every emission is appended to it in order, up
    /// to and including the decisive one.
    pub(crate) fn run(
        &self,
        source: &dyn SignalSource,
        options: ResolutionOptions,
        mut trail: Option<&mut Vec<RuleOutcome>>,
    ) -> Option<Value> {
        let mut resume_at: Option<Stage> = None;

        for rule in &self.rules {
            if !rule.stage.is_enabled(options) {
                continue;
            }
            if resume_at.is_some_and(|stage| rule.stage < stage) {
                continue;
            }

            let Some(emission) = (rule.check)(source, self.directive) else {
                continue;
            };

            tracing::debug!(directive = %self.directive, rule = emission.name, value = %emission.value, "rule fired");

            if let Some(trail) = trail.as_deref_mut() {
                trail.push(RuleOutcome { rule_name: emission.name.to_string(), value: emission.value });
            }

            if emission.value.is_decisive() {
                return Some(emission.value);
            }

            if emission.resume_at.is_some() {
                resume_at = emission.resume_at;
            }
        }

        self.directive.is_negative().then_some(Value::Bool(false))
    }
}
