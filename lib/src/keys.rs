//! Metadata keys shared by the generation and rendering pipeline.

use std::sync::Arc;

use crate::value::Dict;

crate::define_meta_key! {
    pub Layout : "layout" => Arc<str>,
    pub Permalink : "permalink" => Arc<str>,
    pub UrlRef : "url" => Arc<str>,
    pub PermaPath : "permapath" => Arc<str>,
    pub Redirect : "redirect" => Arc<Dict>,
}
