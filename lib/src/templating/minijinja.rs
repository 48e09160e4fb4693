use std::path::Path;
use std::sync::Arc;

use minijinja::{path_loader, Environment};
use minijinja::value::{Enumerator, Object, ObjectRepr, Value};
use serde::Serialize;

use crate::error::Result;
use crate::site::{Page, Site};
use crate::templating::{Engine, EngineInit};

#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl EngineInit for MiniJinjaEngine {
    type Engine = Self;

    fn init<G: Serialize>(templates: Option<&Path>, globals: G) -> Result<Self> {
        let mut env = Environment::new();
        if let Some(dir) = templates {
            env.set_loader(path_loader(dir.to_path_buf()));
        }

        env.add_global("G", Value::from_serialize(&globals));
        env.add_function("join", ext::join);
        env.add_function("now", ext::now);
        env.add_filter("deslug", ext::deslug);
        env.add_filter("date", ext::date);
        Ok(MiniJinjaEngine { env })
    }
}

impl Engine for MiniJinjaEngine {
    fn render(&self, name: &str, site: &Arc<Site>, page: &Arc<Page>) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context(site, page))?)
    }

    fn render_raw(
        &self,
        name: Option<&str>,
        template_str: &str,
        site: &Arc<Site>,
        page: &Arc<Page>,
    ) -> Result<String> {
        let context = context(site, page);
        let string = match name {
            Some(name) => self.env.render_named_str(name, template_str, context)?,
            None => self.env.render_str(template_str, context)?,
        };

        Ok(string)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

fn context(site: &Arc<Site>, page: &Arc<Page>) -> Value {
    minijinja::context! {
        site => Value::from_object(SiteObject(site.clone())),
        page => Value::from_object(PageObject {
            site: site.clone(),
            page: page.clone(),
        }),
    }
}

/// A page as templates see it: its metadata keys, resolved through the
/// site's front-matter defaults, plus `dir` and `name`.
#[derive(Debug)]
struct PageObject {
    site: Arc<Site>,
    page: Arc<Page>,
}

impl Object for PageObject {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let key = key.as_str()?;
        let value = match key {
            "dir" => Value::from(&*self.page.dir),
            "name" => Value::from(self.page.file_name()),
            _ => Value::from_serialize(&self.page.value(&self.site, key)?),
        };

        Some(value)
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        let mut keys = self.page.metadata.keys()
            .map(|key| Value::from(&*key))
            .collect::<Vec<_>>();

        keys.push(Value::from("dir"));
        keys.push(Value::from("name"));
        Enumerator::Values(keys)
    }
}

#[derive(Debug)]
struct SiteObject(Arc<Site>);

impl Object for SiteObject {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        match key.as_str()? {
            "data" => Some(Value::from_serialize(&self.0.data)),
            "pages" => Some(Value::from_object(PagesObject(self.0.clone()))),
            _ => None,
        }
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Str(&["data", "pages"])
    }
}

#[derive(Debug)]
struct PagesObject(Arc<Site>);

impl Object for PagesObject {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Seq
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let index = usize::try_from(key.clone()).ok()?;
        let page = self.0.pages.get(index)?.clone();
        Some(Value::from_object(PageObject { site: self.0.clone(), page }))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        Enumerator::Seq(self.0.pages.len())
    }
}

mod ext {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use minijinja::value::{Rest, Value};
    use minijinja::{Error, ErrorKind, State};

    use crate::url::UrlBuf;

    /// Joins path segments onto the site root, `G.root`.
    pub fn join(state: &State, values: Rest<String>) -> Result<Value, Error> {
        let root = state.lookup("G")
            .and_then(|g| g.get_attr("root").ok())
            .filter(|v| !v.is_undefined())
            .and_then(|v| v.as_str().map(UrlBuf::from));

        let mut url = root.unwrap_or_default();
        url.extend(values.iter());
        Ok(Value::from_safe_string(url.into()))
    }

    pub fn deslug(value: &str) -> String {
        value.replace('-', " ")
    }

    pub fn date(value: Value, fmt: &str) -> Result<Value, Error> {
        if let Ok(ts) = i64::try_from(value.clone()) {
            let datetime = DateTime::<Utc>::from_timestamp(ts, 0)
                .ok_or_else(|| Error::new(
                    ErrorKind::InvalidOperation,
                    "invalid timestamp provided to `date`",
                ))?;

            return Ok(datetime.format(fmt).to_string().into());
        }

        let kind = value.kind();
        let string = value.as_str().ok_or_else(|| Error::new(
            ErrorKind::InvalidOperation,
            format!("`date` must be applied to a string or integer, found {kind}"),
        ))?;

        let formatted = string.parse::<NaiveDate>().map(|d| d.format(fmt).to_string())
            .or_else(|_| string.parse::<NaiveTime>().map(|t| t.format(fmt).to_string()))
            .or_else(|_| string.parse::<NaiveDateTime>().map(|dt| dt.format(fmt).to_string()))
            .or_else(|_| string.parse::<DateTime<Utc>>().map(|dt| dt.format(fmt).to_string()))
            .map_err(|e| Error::new(
                ErrorKind::InvalidOperation,
                format!("failed to parse {string}: {e}"),
            ))?;

        Ok(formatted.into())
    }

    pub fn now() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }
}

impl_from_std_error!(minijinja::Error);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;
    use crate::generate::{Generator, Redirects};
    use crate::value::Value as SiteValue;

    fn one_page_site() -> (Arc<Site>, Arc<Page>) {
        let descriptor: crate::value::Dict = dict!["path" => "/old/", "to" => "/new/"];
        let list = SiteValue::from(vec![SiteValue::from(descriptor)]);
        let mut site = Site::new(dict!["redirects" => list], Default::default());
        Redirects.generate(&mut site).unwrap();

        let site = Arc::new(site);
        let page = site.pages[0].clone();
        (site, page)
    }

    #[test]
    fn page_context_exposes_metadata_and_descriptor() {
        let (site, page) = one_page_site();
        let engine = MiniJinjaEngine::init(None, ()).unwrap();

        let html = engine.render_raw(
            None,
            "{{ page.dir }} {{ page.layout }} {{ page.redirect.to }}",
            &site,
            &page,
        ).unwrap();

        assert_eq!(html, "/old/ redirect /new/");
    }

    #[test]
    fn globals_are_available_as_g() {
        let (site, page) = one_page_site();
        let globals: crate::value::Dict = dict!["root" => "/docs"];
        let engine = MiniJinjaEngine::init(None, &globals).unwrap();

        let html = engine.render_raw(None, "{{ join('a', 'b') }}", &site, &page).unwrap();
        assert_eq!(html, "/docs/a/b");
    }

    #[test]
    fn missing_template_is_reported_absent() {
        let engine = MiniJinjaEngine::init(None, ()).unwrap();
        assert!(!engine.has_template("redirect.html"));
    }
}
