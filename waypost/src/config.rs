use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use signpost::error;
use signpost::defaults::Defaults;
use signpost::error::{Chainable, Result};
use signpost::templating::{Engine, EngineInit};
use signpost::url::UrlBuf;
use signpost::value::{Dict, Format, Toml, Value};

#[derive(Debug)]
pub struct Config {
    pub engine: Arc<dyn Engine>,
    pub settings: Settings,
}

#[derive(Default, Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub root: UrlBuf,
    #[serde(default = "Settings::default_permalink")]
    pub permalink: String,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub redirects: Vec<Dict>,
    #[serde(flatten)]
    pub globals: FxHashMap<String, Value>,
}

impl Settings {
    fn default_permalink() -> String {
        "/:path/".into()
    }
}

impl Config {
    pub fn discover<E: EngineInit>(root: &Path) -> Result<Self> {
        let path = root.join(crate::CONFIG_FILE);
        let mut settings: Settings = match path.is_file() {
            true => Toml::read(&path).chain_with(|| error! {
                "failed to load site configuration",
                "path" => path.display(),
            })?,
            false => Settings::default(),
        };

        settings.root.make_absolute();
        if settings.permalink.is_empty() {
            settings.permalink = Settings::default_permalink();
        }

        let templates = root.join(crate::TEMPLATE_DIR);
        let templates = templates.is_dir().then_some(templates);
        let engine: Arc<dyn Engine> = Arc::new(E::init(templates.as_deref(), &settings)?);
        Ok(Config { engine, settings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_parse_with_defaults_and_globals() {
        let settings: Settings = Toml::from_str(r#"
            root = "https://example.org"
            title = "Example"

            [[redirects]]
            path = "/old/"
            to = "/new/"

            [[defaults]]
            scope = { type = "redirects" }
            values = { layout = "redirect" }
        "#).unwrap();

        assert_eq!(settings.root.as_str(), "https://example.org");
        assert_eq!(settings.permalink, "/:path/");
        assert_eq!(settings.redirects.len(), 1);
        assert_eq!(settings.defaults.rules().len(), 1);
        assert_eq!(
            settings.globals.get("title").and_then(Value::as_str),
            Some("Example"),
        );
    }

    #[test]
    fn empty_settings_are_valid() {
        let settings: Settings = Toml::from_str("").unwrap();
        assert!(settings.root.as_str().is_empty());
        assert!(settings.redirects.is_empty());
        assert_eq!(settings.permalink, "/:path/");
    }
}
