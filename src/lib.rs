#[macro_use]
mod macros;
mod api;
mod config;
mod engine;
mod integrity;
mod request;
mod rules;
mod signals;
mod store;

pub use api::{Resolution, ResolutionOptions, resolve_verbose_with, resolve_with, rule_names};
pub use config::{ConfigError, DirectiveFlags, SiteSettings, SiteSnapshot};
pub use engine::{AssertionLog, AssertionRecorder, DirectiveMap, ResultAggregator};
pub use request::{RequestContext, View};
pub use signals::{Ambient, Classification, ContextFlags, Explicit, PostTypeFlag, SignalSource};
pub use store::{ContentStore, MemoryStore, PostRecord, PostStatus, PostTypeRecord, RobotsMeta, TermRecord};

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Directives -------------------------------------------------------------

/// One crawler-facing instruction.
///
/// The first three are boolean "negative" directives; the last three are
/// optional numeric crawler-budget limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveType {
    Noindex,
    Nofollow,
    Noarchive,
    MaxSnippet,
    MaxImagePreview,
    MaxVideoPreview,
}

impl DirectiveType {
    /// Every directive, in resolution order.
    pub const ALL: [DirectiveType; 6] = [
        DirectiveType::Noindex,
        DirectiveType::Nofollow,
        DirectiveType::Noarchive,
        DirectiveType::MaxSnippet,
        DirectiveType::MaxImagePreview,
        DirectiveType::MaxVideoPreview,
    ];

    /// Canonical snake_case name, as used by settings documents and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            DirectiveType::Noindex => "noindex",
            DirectiveType::Nofollow => "nofollow",
            DirectiveType::Noarchive => "noarchive",
            DirectiveType::MaxSnippet => "max_snippet",
            DirectiveType::MaxImagePreview => "max_image_preview",
            DirectiveType::MaxVideoPreview => "max_video_preview",
        }
    }

    /// Look a directive up by name. Accepts the snake_case and the dashed
    /// meta-tag spelling (`max-snippet`).
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        DirectiveType::ALL.into_iter().find(|d| d.as_str() == normalized)
    }

    /// True for `noindex`, `nofollow` and `noarchive`.
    pub fn is_negative(self) -> bool {
        matches!(self, DirectiveType::Noindex | DirectiveType::Nofollow | DirectiveType::Noarchive)
    }

    pub(crate) fn flag(self) -> DirectiveSet {
        match self {
            DirectiveType::Noindex => DirectiveSet::NOINDEX,
            DirectiveType::Nofollow => DirectiveSet::NOFOLLOW,
            DirectiveType::Noarchive => DirectiveSet::NOARCHIVE,
            DirectiveType::MaxSnippet => DirectiveSet::MAX_SNIPPET,
            DirectiveType::MaxImagePreview => DirectiveSet::MAX_IMAGE_PREVIEW,
            DirectiveType::MaxVideoPreview => DirectiveSet::MAX_VIDEO_PREVIEW,
        }
    }
}

impl fmt::Display for DirectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// The set of directives a caller asks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirectiveSet: u8 {
        const NOINDEX           = 1 << 0;
        const NOFOLLOW          = 1 << 1;
        const NOARCHIVE         = 1 << 2;
        const MAX_SNIPPET       = 1 << 3;
        const MAX_IMAGE_PREVIEW = 1 << 4;
        const MAX_VIDEO_PREVIEW = 1 << 5;

        const NEGATIVE = Self::NOINDEX.bits() | Self::NOFOLLOW.bits() | Self::NOARCHIVE.bits();
        const BUDGET = Self::MAX_SNIPPET.bits() | Self::MAX_IMAGE_PREVIEW.bits() | Self::MAX_VIDEO_PREVIEW.bits();
    }
}

impl DirectiveSet {
    /// Build a set from directive names. Unknown names are dropped.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names.into_iter().filter_map(DirectiveType::from_name).collect()
    }

    /// The contained directives, in resolution order.
    pub fn types(self) -> impl Iterator<Item = DirectiveType> {
        DirectiveType::ALL.into_iter().filter(move |d| self.contains(d.flag()))
    }
}

impl From<DirectiveType> for DirectiveSet {
    fn from(directive: DirectiveType) -> Self {
        directive.flag()
    }
}

impl FromIterator<DirectiveType> for DirectiveSet {
    fn from_iter<I: IntoIterator<Item = DirectiveType>>(iter: I) -> Self {
        iter.into_iter().fold(DirectiveSet::empty(), |set, d| set | d.flag())
    }
}

/// A resolved directive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

impl Value {
    /// Whether this value ends a rule chain: `true` for negative directives,
    /// any number for crawler-budget directives.
    pub fn is_decisive(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Int(_) => true,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            Value::Int(_) => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n),
            Value::Bool(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
        }
    }
}

/// A rule that ran, and what it said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleOutcome {
    pub rule_name: String,
    pub value: Value,
}

// --- Subjects ---------------------------------------------------------------

/// An explicitly addressed content entity.
///
/// Resolving against the current request instead is expressed by passing no
/// entity at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Post(u64),
    Term { id: u64, taxonomy: String },
    PostTypeArchive(String),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Post(id) => write!(f, "post #{id}"),
            EntityRef::Term { id, taxonomy } => write!(f, "term #{id} ({taxonomy})"),
            EntityRef::PostTypeArchive(post_type) => write!(f, "{post_type} archive"),
        }
    }
}

/// Per-item override for one negative directive.
///
/// Overrides are stored as floats for historical reasons; the tri-state is
/// recovered through fixed thresholds rather than the sign. New storage should
/// persist the tri-state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qubit {
    /// Do not apply the directive, but still let protections run.
    ForceIndexable,
    /// Defer to the remaining rules.
    NoOverride,
    /// Apply the directive and stop evaluating.
    ForceDirective,
}

impl Qubit {
    pub const FORCE_INDEXABLE_BELOW: f64 = -0.33;
    pub const FORCE_DIRECTIVE_ABOVE: f64 = 0.33;

    /// Decode a stored override. `NaN` decodes to [`Qubit::NoOverride`].
    pub fn from_raw(raw: f64) -> Self {
        if raw < Self::FORCE_INDEXABLE_BELOW {
            Qubit::ForceIndexable
        } else if raw > Self::FORCE_DIRECTIVE_ABOVE {
            Qubit::ForceDirective
        } else {
            Qubit::NoOverride
        }
    }
}

// --- Rules ------------------------------------------------------------------

/// Rule stages, in evaluation order. Options gate whole stages, and a
/// `ForceIndexable` override jumps straight to [`Stage::Pagination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Stage {
    Override,
    Site,
    Context,
    Pagination,
    Protected,
    Integrity,
    Budget,
}

/// What a rule emits when it applies to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Emission {
    pub name: &'static str,
    pub value: Value,
    /// Skip every remaining rule before this stage.
    pub resume_at: Option<Stage>,
}

impl Emission {
    pub(crate) fn new(name: &'static str, value: Value) -> Self {
        Emission { name, value, resume_at: None }
    }

    pub(crate) fn flag(name: &'static str, value: bool) -> Self {
        Emission::new(name, Value::Bool(value))
    }
}

pub(crate) type Check = fn(&dyn SignalSource, DirectiveType) -> Option<Emission>;

/// A named rule: the stage it belongs to, the directives it serves and the
/// check that produces its emission. A check returning `None` means the rule
/// does not apply to the subject; it is neither decisive nor recorded.
pub(crate) struct Rule {
    pub name: &'static str,
    pub stage: Stage,
    pub directives: DirectiveSet,
    pub check: Check,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("stage", &self.stage)
            .field("directives", &self.directives)
            .field("check", &"<function>")
            .finish()
    }
}
