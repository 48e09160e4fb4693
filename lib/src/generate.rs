//! Page generators: hooks that run before rendering and register pages in
//! the site's page collection.

use std::sync::Arc;

use crate::error::{Chainable, Result};
use crate::keys::{Layout, Redirect};
use crate::site::{Page, Site};
use crate::value::{Dict, Value};

pub trait Generator: Send + Sync {
    fn generate(&self, site: &mut Site) -> Result<()>;
}

/// Runs each generator, in order, over `site`.
pub fn run(generators: &[&dyn Generator], site: &mut Site) -> Result<()> {
    for generator in generators {
        generator.generate(site)?;
    }

    Ok(())
}

/// Generates one redirect page per descriptor in `site.data["redirects"]`.
///
/// Every generated page resides in the descriptor's `path` directory, is
/// named `index.html`, and carries the full descriptor in its metadata under
/// `redirect` along with the fixed `redirect` layout reference.
#[derive(Debug, Default)]
pub struct Redirects;

impl Redirects {
    pub const DATA_KEY: &'static str = "redirects";
    pub const KIND: &'static str = "redirects";
    pub const LAYOUT: &'static str = "redirect";

    fn page(&self, descriptor: &Arc<Dict>) -> Result<Page> {
        let dir = descriptor.get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| error!("redirect descriptor is missing a `path` string"))?;

        let page = Page::new(Self::KIND, dir);
        page.metadata.insert(Layout, Self::LAYOUT);
        page.metadata.insert(Redirect, descriptor.clone());
        Ok(page)
    }
}

impl Generator for Redirects {
    fn generate(&self, site: &mut Site) -> Result<()> {
        let descriptors = match site.data.get(Self::DATA_KEY) {
            Some(value) => value.clone().into_vec().map_err(|value| error! {
                "site data `redirects` must be an array of redirect descriptors",
                "found" => value.kind(),
            })?,
            None => return Ok(()),
        };

        for (i, descriptor) in descriptors.iter().enumerate() {
            let descriptor = descriptor.clone().into_dict().map_err(|value| error! {
                "redirect descriptor must be a table",
                "index" => i,
                "found" => value.kind(),
            })?;

            let page = self.page(&descriptor).chain_with(|| error! {
                "invalid redirect descriptor",
                "index" => i,
            })?;

            site.register(page);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    fn site_with(descriptors: Vec<Dict>) -> Site {
        let list = descriptors.into_iter().map(Value::from).collect::<Value>();
        Site::new(dict![Redirects::DATA_KEY => list], Default::default())
    }

    fn generate(site: &mut Site) -> Result<()> {
        run(&[&Redirects], site)
    }

    #[test]
    fn one_page_per_descriptor() {
        let mut site = site_with(vec![
            dict!["path" => "/learn/program", "to" => "/program/"],
            dict!["path" => "/about/authors", "to" => "/authors/"],
        ]);

        generate(&mut site).unwrap();
        assert_eq!(site.pages.len(), 2);
        assert_eq!(&*site.pages[0].dir, "/learn/program");
        assert_eq!(&*site.pages[1].dir, "/about/authors");
    }

    #[test]
    fn filename_is_always_index_html() {
        let mut site = site_with(vec![dict!["path" => "/old/"]]);
        generate(&mut site).unwrap();
        assert_eq!(site.pages[0].file_name(), "index.html");
    }

    #[test]
    fn payload_contains_descriptor_and_layout() {
        let descriptor = dict!["path" => "/old/", "to" => "https://example.org/new/"];
        let mut site = site_with(vec![descriptor.clone()]);
        generate(&mut site).unwrap();

        let page = &site.pages[0];
        assert_eq!(&*page.metadata.get(Layout).unwrap().unwrap(), Redirects::LAYOUT);

        let payload = page.metadata.get(Redirect).unwrap().unwrap();
        assert_eq!(&*payload, &descriptor);
    }

    #[test]
    fn zero_descriptors_generate_zero_pages() {
        let mut site = site_with(vec![]);
        generate(&mut site).unwrap();
        assert!(site.pages.is_empty());

        let mut site = Site::new(Dict::new(), Default::default());
        generate(&mut site).unwrap();
        assert!(site.pages.is_empty());
    }

    #[test]
    fn duplicate_paths_are_not_deduplicated() {
        let mut site = site_with(vec![
            dict!["path" => "/old/"],
            dict!["path" => "/old/"],
        ]);

        generate(&mut site).unwrap();
        assert_eq!(site.pages.len(), 2);
    }

    #[test]
    fn descriptor_without_path_is_an_error() {
        let mut site = site_with(vec![dict!["to" => "/new/"]]);
        let error = generate(&mut site).unwrap_err();
        assert!(error.to_string().contains("path"));
    }

    #[test]
    fn non_array_data_is_an_error() {
        let mut site = Site::new(dict![Redirects::DATA_KEY => "nope"], Default::default());
        let error = generate(&mut site).unwrap_err();
        assert!(error.to_string().contains("array"));
    }
}
