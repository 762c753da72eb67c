//! Site configuration and snapshot loading.
//!
//! [`SiteSettings`] carries every site-wide option the rule chains consult.
//! It is a plain value: the host fills it from its own option storage, or it
//! is deserialized from a snapshot document.
//!
//! A [`SiteSnapshot`] bundles settings, content and (optionally) the current
//! request into one JSON or YAML document:
//!
//! ```yaml
//! settings:
//!   site: { noindex: false }
//!   search: { noindex: true }
//!   set_copyright_directives: true
//!   max_snippet: 120
//! content:
//!   posts:
//!     42: { post_type: post, robots: { noindex: 1 } }
//! request:
//!   view: { kind: search }
//! ```

use crate::request::RequestContext;
use crate::store::MemoryStore;
use crate::DirectiveType;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// On/off switches for the three negative directives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectiveFlags {
    pub noindex: bool,
    pub nofollow: bool,
    pub noarchive: bool,
}

impl DirectiveFlags {
    pub const NONE: DirectiveFlags = DirectiveFlags { noindex: false, nofollow: false, noarchive: false };

    /// The switch for `directive`; always off for crawler-budget directives.
    pub fn get(&self, directive: DirectiveType) -> bool {
        match directive {
            DirectiveType::Noindex => self.noindex,
            DirectiveType::Nofollow => self.nofollow,
            DirectiveType::Noarchive => self.noarchive,
            _ => false,
        }
    }
}

/// Site-wide options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// `site_<directive>`: applies to every page.
    pub site: DirectiveFlags,
    pub homepage: DirectiveFlags,
    pub author: DirectiveFlags,
    pub date: DirectiveFlags,
    pub search: DirectiveFlags,
    /// Flags per post type, applied to singular views and post-type archives.
    pub post_types: BTreeMap<String, DirectiveFlags>,
    /// Flags per taxonomy, applied to term archives.
    pub taxonomies: BTreeMap<String, DirectiveFlags>,

    /// Noindex archives beyond their first page.
    pub paged_noindex: bool,
    /// Noindex the homepage beyond its first page.
    pub home_paged_noindex: bool,
    /// Noindex comment pages beyond the first.
    pub comment_paged_noindex: bool,

    pub set_copyright_directives: bool,
    pub max_snippet: i64,
    pub max_image_preview: i64,
    pub max_video_preview: i64,

    /// Inspect query variables for exploited/malformed requests.
    pub advanced_query_protection: bool,
    /// Post id shown as the front page, if the front page is a static page.
    pub static_front_page: Option<u64>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            site: DirectiveFlags::NONE,
            homepage: DirectiveFlags::NONE,
            author: DirectiveFlags::NONE,
            date: DirectiveFlags::NONE,
            search: DirectiveFlags { noindex: true, ..DirectiveFlags::NONE },
            post_types: BTreeMap::new(),
            taxonomies: BTreeMap::new(),
            paged_noindex: false,
            home_paged_noindex: false,
            comment_paged_noindex: true,
            set_copyright_directives: false,
            max_snippet: -1,
            max_image_preview: -1,
            max_video_preview: -1,
            advanced_query_protection: true,
            static_front_page: None,
        }
    }
}

impl SiteSettings {
    pub fn post_type_flags(&self, post_type: &str) -> DirectiveFlags {
        self.post_types.get(post_type).copied().unwrap_or_default()
    }

    pub fn taxonomy_flags(&self, taxonomy: &str) -> DirectiveFlags {
        self.taxonomies.get(taxonomy).copied().unwrap_or_default()
    }

    /// Configured crawler-budget value, ignoring whether copyright directives
    /// are enabled.
    pub fn copyright_value(&self, directive: DirectiveType) -> Option<i64> {
        match directive {
            DirectiveType::MaxSnippet => Some(self.max_snippet),
            DirectiveType::MaxImagePreview => Some(self.max_image_preview),
            DirectiveType::MaxVideoPreview => Some(self.max_video_preview),
            _ => None,
        }
    }

    pub fn is_static_front_page(&self, post_id: u64) -> bool {
        self.static_front_page == Some(post_id)
    }
}

/// Everything needed to resolve directives offline.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteSnapshot {
    pub settings: SiteSettings,
    pub content: MemoryStore,
    pub request: RequestContext,
}

/// Errors raised while loading a snapshot document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("snapshot path does not exist: {0}")]
    MissingPath(String),
    #[error("failed to read snapshot from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot from {path}: {message}")]
    Parse { path: String, message: String },
}

impl ConfigError {
    fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io { path: path.into().display().to_string(), source }
    }

    fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Parse { path: path.into().display().to_string(), message: message.into() }
    }
}

impl SiteSnapshot {
    /// Load a snapshot from a `.json`, `.yaml` or `.yml` file. Other extensions
    /// are tried as YAML, which also accepts JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingPath(path.display().to_string()));
        }

        let raw = fs::read_to_string(path).map_err(|err| ConfigError::from_io(path, err))?;
        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        Self::parse(&raw, is_json).map_err(|message| ConfigError::parse_error(path, message))
    }

    fn parse(raw: &str, is_json: bool) -> Result<Self, String> {
        if is_json {
            serde_json::from_str(raw).map_err(|err| err.to_string())
        } else {
            serde_yaml::from_str(raw).map_err(|err| err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::View;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let raw = r#"
settings:
  site: { nofollow: true }
  max_snippet: 120
content:
  posts:
    42: { post_type: post, robots: { noindex: 1 } }
  taxonomies:
    category: [post]
request:
  view: { kind: search }
  page: 2
"#;
        let snapshot = SiteSnapshot::parse(raw, false).unwrap();

        assert!(snapshot.settings.site.nofollow);
        assert!(!snapshot.settings.site.noindex);
        assert!(snapshot.settings.search.noindex);
        assert!(snapshot.settings.advanced_query_protection);
        assert_eq!(snapshot.settings.max_snippet, 120);
        assert_eq!(snapshot.settings.max_video_preview, -1);
        assert_eq!(snapshot.content.posts[&42].robots.noindex, 1.0);
        assert_eq!(snapshot.request.view, View::Search);
        assert_eq!(snapshot.request.page, 2);
    }

    #[test]
    fn json_snapshot_parses() {
        let raw = r#"{ "settings": { "static_front_page": 2 }, "content": { "posts": { "2": { "post_type": "page" } } } }"#;
        let snapshot = SiteSnapshot::parse(raw, true).unwrap();
        assert!(snapshot.settings.is_static_front_page(2));
        assert_eq!(snapshot.content.posts[&2].post_type, "page");
    }

    #[test]
    fn missing_file_is_reported() {
        let err = SiteSnapshot::from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath(_)));
    }

    #[test]
    fn directive_flags_ignore_budget_directives() {
        let flags = DirectiveFlags { noindex: true, nofollow: true, noarchive: true };
        assert!(flags.get(DirectiveType::Noarchive));
        assert!(!flags.get(DirectiveType::MaxSnippet));
    }
}
