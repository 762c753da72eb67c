//! Content store interface.
//!
//! The engine never talks to a database. Everything it knows about posts,
//! terms and post-type archives comes through [`ContentStore`], which the host
//! implements against whatever cache or storage layer it already has.
//!
//! [`MemoryStore`] is a plain in-memory implementation. It deserializes from
//! the `content` section of a site snapshot and is what the CLI and the tests
//! use.

use crate::{DirectiveType, Qubit};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Read-only lookups the engine needs from the content layer.
///
/// Missing records are answered with `None`; the engine treats that as "no
/// signal" and never fails because of it.
pub trait ContentStore {
    fn post(&self, id: u64) -> Option<&PostRecord>;
    fn term(&self, taxonomy: &str, id: u64) -> Option<&TermRecord>;
    fn post_type(&self, post_type: &str) -> Option<&PostTypeRecord>;
    /// Post types a taxonomy is registered for. `None` if the taxonomy is unknown.
    fn taxonomy_post_types(&self, taxonomy: &str) -> Option<&[String]>;
}

/// Stored per-item robots overrides, one legacy float per negative directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RobotsMeta {
    pub noindex: f64,
    pub nofollow: f64,
    pub noarchive: f64,
}

impl RobotsMeta {
    /// Decode the override for `directive`. Crawler-budget directives have no
    /// per-item override.
    pub fn qubit(&self, directive: DirectiveType) -> Qubit {
        match directive {
            DirectiveType::Noindex => Qubit::from_raw(self.noindex),
            DirectiveType::Nofollow => Qubit::from_raw(self.nofollow),
            DirectiveType::Noarchive => Qubit::from_raw(self.noarchive),
            _ => Qubit::NoOverride,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Publish,
    Private,
    Draft,
    Pending,
    Future,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    pub post_type: String,
    #[serde(default)]
    pub status: PostStatus,
    /// Whether the post requires a password to view.
    #[serde(default)]
    pub password: bool,
    /// Number of content pages (`<!--nextpage-->` splits); 0 and 1 both mean one.
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub robots: RobotsMeta,
}

impl PostRecord {
    pub fn new(post_type: impl Into<String>) -> Self {
        PostRecord {
            post_type: post_type.into(),
            status: PostStatus::default(),
            password: false,
            pages: 1,
            robots: RobotsMeta::default(),
        }
    }

    /// Password-protected or private.
    pub fn is_protected(&self) -> bool {
        self.password || self.status == PostStatus::Private
    }

    pub(crate) fn page_count(&self) -> u32 {
        self.pages.max(1)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermRecord {
    /// Number of posts assigned to the term.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub robots: RobotsMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostTypeRecord {
    #[serde(default)]
    pub has_archive: bool,
    /// Overrides stored for the post-type archive.
    #[serde(default)]
    pub robots: RobotsMeta,
}

/// In-memory [`ContentStore`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub posts: BTreeMap<u64, PostRecord>,
    /// Terms keyed by taxonomy, then term id.
    pub terms: BTreeMap<String, BTreeMap<u64, TermRecord>>,
    pub post_types: BTreeMap<String, PostTypeRecord>,
    /// Taxonomy name -> post types it is bound to.
    pub taxonomies: BTreeMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn with_post(mut self, id: u64, post: PostRecord) -> Self {
        self.posts.insert(id, post);
        self
    }

    pub fn with_term(mut self, taxonomy: &str, id: u64, term: TermRecord) -> Self {
        self.terms.entry(taxonomy.to_string()).or_default().insert(id, term);
        self
    }

    pub fn with_post_type(mut self, post_type: &str, record: PostTypeRecord) -> Self {
        self.post_types.insert(post_type.to_string(), record);
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: &str, post_types: &[&str]) -> Self {
        self.taxonomies.insert(taxonomy.to_string(), post_types.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl ContentStore for MemoryStore {
    fn post(&self, id: u64) -> Option<&PostRecord> {
        self.posts.get(&id)
    }

    fn term(&self, taxonomy: &str, id: u64) -> Option<&TermRecord> {
        self.terms.get(taxonomy)?.get(&id)
    }

    fn post_type(&self, post_type: &str) -> Option<&PostTypeRecord> {
        self.post_types.get(post_type)
    }

    fn taxonomy_post_types(&self, taxonomy: &str) -> Option<&[String]> {
        self.taxonomies.get(taxonomy).map(Vec::as_slice)
    }
}
