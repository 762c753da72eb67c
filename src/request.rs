//! Snapshot of the request being served.
//!
//! The host resolves the query; the engine only reads the outcome. A
//! [`RequestContext`] is what the ambient signal source inspects when no
//! entity is passed to `resolve()`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// What the current request resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    /// The site front page, whether it lists posts or shows a static page.
    FrontPage,
    Singular {
        post: u64,
    },
    Term {
        id: u64,
        taxonomy: String,
    },
    PostTypeArchive {
        post_type: String,
    },
    Author {
        id: u64,
    },
    Date,
    Search,
    NotFound,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub view: View,
    /// Requested page number; 0 and 1 both mean the first page.
    pub page: u32,
    /// Requested comment page number; 0 and 1 both mean the first page.
    pub cpage: u32,
    /// Number of posts the main query found, for archive-like views.
    pub found_posts: Option<u64>,
    /// Raw query variables as received.
    pub query: BTreeMap<String, String>,
    /// Verdict from the host's own request-integrity check. When set it
    /// replaces the built-in query inspection.
    pub exploited: Option<bool>,
}

impl RequestContext {
    pub fn new(view: View) -> Self {
        RequestContext { view, ..Default::default() }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_cpage(mut self, cpage: u32) -> Self {
        self.cpage = cpage;
        self
    }

    pub fn with_found_posts(mut self, found: u64) -> Self {
        self.found_posts = Some(found);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// Page number when beyond the first page.
    pub fn paged(&self) -> Option<u32> {
        (self.page > 1).then_some(self.page)
    }

    /// Comment page number when beyond the first page.
    pub fn comment_paged(&self) -> Option<u32> {
        (self.cpage > 1).then_some(self.cpage)
    }
}
