pub mod minijinja;

use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::site::{Page, Site};

/// Constructs a templating [`Engine`] over a site's template directory.
pub trait EngineInit {
    type Engine: Engine + 'static;

    fn init<G: Serialize>(templates: Option<&Path>, globals: G) -> Result<Self::Engine>;
}

pub trait Engine: Send + Sync + Debug {
    /// Renders the named template with the standard site/page context.
    fn render(&self, name: &str, site: &Arc<Site>, page: &Arc<Page>) -> Result<String>;

    /// Renders an in-memory template string with the standard context. The
    /// optional `name` appears in error messages.
    fn render_raw(
        &self,
        name: Option<&str>,
        template_str: &str,
        site: &Arc<Site>,
        page: &Arc<Page>,
    ) -> Result<String>;

    fn has_template(&self, name: &str) -> bool;
}
