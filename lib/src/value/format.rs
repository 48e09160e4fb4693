use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Chainable, Error, Result};

/// A data format that site data and configuration files may be written in.
pub trait Format {
    /// The file extension the format is recognized by.
    const EXTENSION: &'static str;

    type Error: serde::de::Error + Into<Error> + 'static;

    fn from_str<T: DeserializeOwned>(string: &str) -> Result<T, Self::Error>;

    fn read<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let string = fs::read_to_string(path).chain_with(|| error! {
            "failed to read file",
            "path" => path.display(),
        })?;

        Self::from_str(&string).chain_with(|| error! {
            "failed to parse file",
            "format" => Self::EXTENSION,
            "path" => path.display(),
        })
    }
}

macro_rules! impl_format {
    ($name:ident : $ext:literal, $func:expr, $E:ty) => (
        pub struct $name;

        impl Format for $name {
            const EXTENSION: &'static str = $ext;

            type Error = $E;

            fn from_str<T: DeserializeOwned>(s: &str) -> Result<T, $E> {
                $func(s)
            }
        }
    );
}

impl_format!(Toml: "toml", toml::from_str, toml::de::Error);
impl_format!(Json: "json", serde_json::from_str, serde_json::Error);
