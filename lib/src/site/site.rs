use std::sync::Arc;

use crate::defaults::Defaults;
use crate::site::Page;
use crate::value::Dict;

/// A site build: the site-wide data collection, the front-matter defaults
/// table, and the registry of generated pages.
#[derive(Debug, Default)]
pub struct Site {
    pub data: Dict,
    pub defaults: Defaults,
    pub pages: Vec<Arc<Page>>,
}

impl Site {
    pub fn new(data: Dict, defaults: Defaults) -> Site {
        Site { data, defaults, pages: vec![] }
    }

    /// Registers `page` in the site's page collection.
    pub fn register(&mut self, page: Page) -> Arc<Page> {
        let page = Arc::new(page);
        self.pages.push(page.clone());
        page
    }

    pub fn visualize(&self) {
        println!("🗂 {} page(s)", self.pages.len());
        for (i, page) in self.pages.iter().enumerate() {
            let prefix = match i == self.pages.len() - 1 {
                true => "└── ",
                false => "├── ",
            };

            println!("{prefix}📝 {} → {}", page.dir, page.permapath().display());
        }
    }
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    assert_impl_all!(super::Site: Send, Sync);
}
