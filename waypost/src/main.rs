use std::sync::Arc;
use std::time::SystemTime;

use signpost::data;
use signpost::error::Result;
use signpost::generate::{self, Redirects};
use signpost::render::{render_site, RenderOptions};
use signpost::site::Site;
use signpost::templating::minijinja::MiniJinjaEngine;
use signpost::value::Value;

use crate::config::Config;

mod config;

pub const DATA_DIR: &str = "data";
pub const TEMPLATE_DIR: &str = "templates";
pub const CONFIG_FILE: &str = "config.toml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Generates redirect pages for a static site.
        cmd waypost {
            /// Site source directory (config.toml, data/, templates/).
            required input: PathBuf
            /// Directory rendered pages are written into.
            required output: PathBuf
            /// Print the generated page tree after rendering.
            optional -v, --verbose
        }
    }
}

fn main() {
    let flags = flags::Waypost::from_env_or_exit();
    if let Err(e) = build(&flags) {
        println!("error: {e}");
        std::process::exit(1);
    }
}

fn build(flags: &flags::Waypost) -> Result<()> {
    let start = SystemTime::now();
    let config = Config::discover::<MiniJinjaEngine>(&flags.input)?;

    let data_dir = flags.input.join(DATA_DIR);
    let mut data = match data_dir.is_dir() {
        true => data::load_dir(&data_dir)?,
        false => Default::default(),
    };

    // Inline descriptors from config.toml take precedence over data files.
    if !config.settings.redirects.is_empty() {
        let list = config.settings.redirects.iter()
            .cloned()
            .map(Value::from)
            .collect::<Value>();

        data.insert(Redirects::DATA_KEY.into(), list);
    }

    let mut site = Site::new(data, config.settings.defaults.clone());
    generate::run(&[&Redirects], &mut site)?;
    println!("discovery time: {}ms", start.elapsed().unwrap().as_millis());

    let render = SystemTime::now();
    let site = Arc::new(site);
    let options = RenderOptions {
        output: flags.output.clone(),
        root: config.settings.root.clone(),
        permalink: config.settings.permalink.clone(),
    };

    render_site(&site, &*config.engine, &options)?;
    println!("render time: {}ms", render.elapsed().unwrap().as_millis());
    println!("total time: {}ms", start.elapsed().unwrap().as_millis());

    if flags.verbose {
        site.visualize();
    }

    Ok(())
}
