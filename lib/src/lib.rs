//! A toolkit for generating redirect pages for static sites.
//!
//! # Overview
//!
//! Signpost turns a list of *redirect descriptors* into rendered
//! `index.html` pages. A descriptor is a table with a `path`, the directory
//! the generated page resides in, and arbitrary metadata such as a
//! destination URL. Signpost supplies the pieces an SSG would otherwise
//! provide around that list:
//!
//!   * a **site** holding the site-wide data collection, the front-matter
//!     defaults table, and the registry of generated pages;
//!
//!   * **generators**, hooks that read site data and register pages. The
//!     built-in [`generate::Redirects`] generator registers one page per
//!     descriptor in `site.data["redirects"]`;
//!
//!   * a **renderer** that assigns each page a URL from a permalink pattern,
//!     renders its layout through a templating [`templating::Engine`]
//!     (falling back to a builtin meta-refresh layout), and writes the
//!     output tree in parallel.
//!
//! Pages are dictionaries of string keys and JSON-like values. A metadata
//! lookup that misses a page's own dictionary falls back to the site's
//! front-matter defaults, scoped by page kind and directory.

#[macro_use]
pub mod error;
pub mod value;
pub mod url;
pub mod site;
pub mod defaults;
pub mod keys;
pub mod data;
pub mod generate;
pub mod permalink;
pub mod render;
pub mod templating;

pub use site::*;
pub use keys::*;

pub use rayon;
