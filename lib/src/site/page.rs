use std::path::PathBuf;
use std::sync::Arc;

use crate::dict;
use crate::site::{Metadata, Site};
use crate::value::{Dict, Value};

/// A generated page: an output directory, a fixed file name, and a metadata
/// payload the rendering layout consumes.
#[derive(Debug, Clone)]
pub struct Page {
    /// The kind of page, used to scope front-matter defaults lookups.
    pub kind: Arc<str>,
    /// The directory the page will reside in, relative to the site root.
    pub dir: Arc<str>,
    /// The file name without the extension.
    pub basename: Arc<str>,
    /// The extension.
    pub ext: Arc<str>,
    pub metadata: Metadata,
}

impl Page {
    pub fn new<K, D>(kind: K, dir: D) -> Page
        where K: Into<Arc<str>>, D: Into<Arc<str>>
    {
        Page {
            kind: kind.into(),
            dir: dir.into(),
            basename: "index".into(),
            ext: ".html".into(),
            metadata: Metadata::new(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.basename, self.ext)
    }

    /// The page's output path relative to the output root.
    pub fn permapath(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.dir.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }

        path.join(self.file_name())
    }

    /// Placeholders available when constructing the page's URL.
    pub fn url_placeholders(&self) -> Dict {
        dict! {
            "path" => self.dir.clone(),
            "category" => self.dir.clone(),
            "basename" => self.basename.clone(),
            "output_ext" => self.ext.clone(),
        }
    }

    /// Reads `key` from the page's metadata, falling back to the site's
    /// front-matter defaults scoped by the page's kind and directory.
    pub fn value(&self, site: &Site, key: &str) -> Option<Value> {
        self.metadata.get_raw(key)
            .or_else(|| site.defaults.find(&self.dir, &self.kind, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Page: Send, Sync);

    #[test]
    fn permapath_is_dir_plus_index_html() {
        let page = Page::new("redirects", "/learn/program");
        assert_eq!(page.permapath(), PathBuf::from("learn/program/index.html"));

        let page = Page::new("redirects", "");
        assert_eq!(page.permapath(), PathBuf::from("index.html"));
    }

    #[test]
    fn placeholders_reflect_the_page() {
        let page = Page::new("redirects", "/learn/");
        let placeholders = page.url_placeholders();
        assert_eq!(placeholders.get("path").and_then(Value::as_str), Some("/learn/"));
        assert_eq!(placeholders.get("category").and_then(Value::as_str), Some("/learn/"));
        assert_eq!(placeholders.get("basename").and_then(Value::as_str), Some("index"));
        assert_eq!(placeholders.get("output_ext").and_then(Value::as_str), Some(".html"));
    }
}
