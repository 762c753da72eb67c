//! Static rule chains.
//!
//! All rules are collected once and split into one [`RuleChain`] per
//! directive. Chains are immutable after construction and shared by every
//! aggregator and thread.
//!
//! ## Invariants
//!
//! - `CHAINS[d as usize]` serves directive `d`; `CHAINS` follows
//!   `DirectiveType::ALL` order, which matches the enum discriminants.

use super::chain::RuleChain;
use crate::{DirectiveType, Rule};
use once_cell::sync::Lazy;

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = crate::rules::negative::get();
    rules.extend(crate::rules::budget::get());
    rules
});

static CHAINS: Lazy<Vec<RuleChain>> =
    Lazy::new(|| DirectiveType::ALL.into_iter().map(|directive| RuleChain::new(directive, &RULES)).collect());

/// The chain serving `directive`.
pub(crate) fn chain_for(directive: DirectiveType) -> &'static RuleChain {
    &CHAINS[directive as usize]
}
