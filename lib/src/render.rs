//! The rendering pipeline: each page gets a URL and an output path, renders
//! through its layout, and is written to disk, fanned out over a thread pool.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Chainable, Result};
use crate::keys::{Layout, Permalink, PermaPath, UrlRef};
use crate::permalink;
use crate::site::{MetaKey, Page, Site};
use crate::templating::Engine;
use crate::url::UrlBuf;

/// The layout pages render with when the site's templates supply none.
/// Emits a meta-refresh page pointing at the descriptor's `to` URL.
pub const FALLBACK_TEMPLATE: &str = r#"<!doctype html>
<html lang="en-US">
  <head>
    <meta charset="utf-8">
    <title>Redirecting&hellip;</title>
    <link rel="canonical" href="{{ page.redirect.to }}">
    <meta http-equiv="refresh" content="0; url={{ page.redirect.to }}">
    <meta name="robots" content="noindex">
  </head>
  <body>
    <h1>Redirecting&hellip;</h1>
    <a href="{{ page.redirect.to }}">Click here if you are not redirected.</a>
  </body>
</html>
"#;

/// The name the fallback layout is registered under in render errors.
const FALLBACK_NAME: &str = "builtin/redirect.html";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// The directory rendered pages are written into.
    pub output: PathBuf,
    /// The site root every page URL is prefixed with.
    pub root: UrlBuf,
    /// The site-wide permalink pattern, e.g. `/:path/`.
    pub permalink: String,
}

/// Renders every page in `site` and writes the results under
/// `options.output`. Pages render independently and in parallel; failures
/// are collected across pages rather than stopping at the first.
pub fn render_site(site: &Arc<Site>, engine: &dyn Engine, options: &RenderOptions) -> Result<()> {
    try_pages(site, |page| prepare_page(site, page, options))?;
    try_pages(site, |page| write_page(site, page, engine, options).chain_with(|| error! {
        "failed to render page",
        "directory" => &page.dir,
    }))
}

fn try_pages<F>(site: &Arc<Site>, f: F) -> Result<()>
    where F: Fn(&Arc<Page>) -> Result<()> + Send + Sync
{
    site.pages.par_iter()
        .map(f)
        .reduce(|| Ok(()), |a, b| match (a, b) {
            (Ok(()), r) | (r, Ok(())) => r,
            (Err(e1), Err(e2)) => Err(e1.chain(e2)),
        })
}

/// Computes the page's URL and output path and stores both in its metadata,
/// so templates can reference them.
fn prepare_page(site: &Arc<Site>, page: &Arc<Page>, options: &RenderOptions) -> Result<()> {
    let pattern = match page.value(site, Permalink::KEY) {
        Some(value) => value.into_str().map_err(|value| error! {
            "page `permalink` must be a string",
            "directory" => &page.dir,
            "found" => value.kind(),
        })?,
        None => options.permalink.as_str().into(),
    };

    let placeholders = page.url_placeholders();
    let mut url = permalink::expand(&pattern, &placeholders).chain_with(|| error! {
        "failed to expand permalink",
        "directory" => &page.dir,
        "pattern" => &pattern,
    })?;

    url.make_relative().prepend(&options.root);
    page.metadata.insert(UrlRef, url);
    page.metadata.insert(PermaPath, page.permapath().to_string_lossy().to_string());
    Ok(())
}

fn write_page(
    site: &Arc<Site>,
    page: &Arc<Page>,
    engine: &dyn Engine,
    options: &RenderOptions,
) -> Result<()> {
    let layout = match page.value(site, Layout::KEY) {
        Some(value) => Some(value.into_str().map_err(|value| error! {
            "page `layout` must be a string",
            "found" => value.kind(),
        })?),
        None => None,
    };

    let template = layout.as_deref().map(|layout| format!("{layout}.html"));
    let html = match template {
        Some(ref name) if engine.has_template(name) => engine.render(name, site, page)
            .chain_with(|| error! {
                "template rendering failed",
                "template used" => name,
            })?,
        _ => engine.render_raw(Some(FALLBACK_NAME), FALLBACK_TEMPLATE, site, page)
            .chain_with(|| "fallback rendering failed")?,
    };

    let path = options.output.join(page.permapath());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).chain_with(|| error! {
            "failed to create output directory",
            "path" => parent.display(),
        })?;
    }

    fs::write(&path, html).chain_with(|| error! {
        "failed to write rendered page",
        "path" => path.display(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;
    use crate::generate::{self, Redirects};
    use crate::templating::minijinja::MiniJinjaEngine;
    use crate::templating::EngineInit;
    use crate::value::Value;

    fn redirect_site(descriptors: Vec<crate::value::Dict>) -> Arc<Site> {
        let list = descriptors.into_iter().map(Value::from).collect::<Value>();
        let mut site = Site::new(dict![Redirects::DATA_KEY => list], Default::default());
        generate::run(&[&Redirects], &mut site).unwrap();
        Arc::new(site)
    }

    fn options(output: &std::path::Path) -> RenderOptions {
        RenderOptions {
            output: output.to_path_buf(),
            root: UrlBuf::from("/"),
            permalink: "/:path/".into(),
        }
    }

    #[test]
    fn fallback_renders_a_meta_refresh_page() {
        let out = tempfile::tempdir().unwrap();
        let site = redirect_site(vec![
            dict!["path" => "/learn/program", "to" => "https://example.org/program/"],
        ]);

        let engine = MiniJinjaEngine::init(None, ()).unwrap();
        render_site(&site, &engine, &options(out.path())).unwrap();

        let html = fs::read_to_string(out.path().join("learn/program/index.html")).unwrap();
        assert!(html.contains("https://example.org/program/"));
        assert!(html.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn page_url_is_root_plus_expanded_permalink() {
        let out = tempfile::tempdir().unwrap();
        let site = redirect_site(vec![dict!["path" => "/old/", "to" => "/new/"]]);

        let engine = MiniJinjaEngine::init(None, ()).unwrap();
        let mut options = options(out.path());
        options.root = UrlBuf::from("/docs");
        render_site(&site, &engine, &options).unwrap();

        let url = site.pages[0].metadata.get_raw(UrlRef::KEY).unwrap();
        assert_eq!(url.as_str(), Some("/docs/old/"));

        let permapath = site.pages[0].metadata.get_raw(PermaPath::KEY).unwrap();
        assert_eq!(permapath.as_str(), Some("old/index.html"));
    }

    #[test]
    fn every_descriptor_produces_a_file() {
        let out = tempfile::tempdir().unwrap();
        let site = redirect_site(vec![
            dict!["path" => "/a/", "to" => "/x/"],
            dict!["path" => "/b/c", "to" => "/y/"],
        ]);

        let engine = MiniJinjaEngine::init(None, ()).unwrap();
        render_site(&site, &engine, &options(out.path())).unwrap();

        assert!(out.path().join("a/index.html").is_file());
        assert!(out.path().join("b/c/index.html").is_file());
    }
}
