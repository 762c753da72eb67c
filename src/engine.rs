//! Resolution engine.
//!
//! ## How the parts work together
//!
//! ```text
//! rules::negative::get ─┐
//! rules::budget::get  ──┴─ registry (registry.rs)
//!                           one RuleChain per DirectiveType, built once
//!                                   │
//! caller ── ResultAggregator::resolve (aggregate.rs)
//!             - Explicit source when an entity is given, Ambient otherwise
//!             - for each requested directive:
//!                   RuleChain::run (chain.rs)
//!                     - stage gating by ResolutionOptions
//!                     - first decisive emission wins
//!                     - optional trail -> AssertionRecorder (assertions.rs)
//!             - collect DirectiveMap
//! ```
//!
//! ## Responsibilities by module
//!
//! - `chain.rs`: the precedence/short-circuit algorithm over an ordered rule
//!   list.
//! - `registry.rs`: the static, per-directive rule chains.
//! - `assertions.rs`: the opt-in audit trail of rules that fired.
//! - `aggregate.rs`: the public entry point tying sources, chains and the
//!   recorder together.
//!
//! ## Adding rules
//!
//! Declare the rule with `rule!` in `src/rules/**` and give it a `Stage`. The
//! registry orders chains by stage, keeping declaration order within a stage,
//! so a new rule only has to pick the right stage and position.
//!
//! ## Debugging
//!
//! Every emission is logged as a `tracing` debug event with the directive,
//! rule name and value (`RUST_LOG=metarobots=debug`).

#[path = "engine/aggregate.rs"]
mod aggregate;
#[path = "engine/assertions.rs"]
mod assertions;
#[path = "engine/chain.rs"]
mod chain;
#[path = "engine/registry.rs"]
mod registry;

pub use aggregate::{DirectiveMap, ResultAggregator};
pub use assertions::{AssertionLog, AssertionRecorder};
pub(crate) use registry::chain_for;
