//! Site data: a directory of TOML and JSON files read into one dictionary.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Chainable, Result};
use crate::value::{Dict, Format, Json, Toml, Value};

/// Reads every `.toml` and `.json` file under `root` into a single
/// dictionary. Files are keyed by file stem and subdirectories become nested
/// dictionaries, so `data/nav/footer.toml` lands at `data["nav"]["footer"]`.
/// Files with other extensions are ignored.
pub fn load_dir(root: &Path) -> Result<Dict> {
    if !root.is_dir() {
        return err! {
            "data path must point to an existing directory",
            "path" => root.display(),
        };
    }

    let mut data = Dict::new();
    for entry in jwalk::WalkDir::new(root).sort(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str());
        let value: Value = if ext == Some(Toml::EXTENSION) {
            Toml::read(&path)?
        } else if ext == Some(Json::EXTENSION) {
            Json::read(&path)?
        } else {
            continue;
        };

        let relative = path.strip_prefix(root).map_err(|_| error! {
            "data file escapes the data directory",
            "path" => path.display(),
        })?;

        insert(&mut data, relative, value).chain_with(|| error! {
            "failed to load data file",
            "path" => path.display(),
        })?;
    }

    Ok(data)
}

fn insert(data: &mut Dict, relative: &Path, value: Value) -> Result<()> {
    let mut keys = relative.iter()
        .map(|part| Arc::<str>::from(part.to_string_lossy()))
        .collect::<Vec<_>>();

    let stem = relative.file_stem()
        .map(|stem| Arc::<str>::from(stem.to_string_lossy()))
        .ok_or_else(|| error!("data file has no file stem"))?;

    keys.pop();

    let mut dict = data;
    for key in keys {
        let slot = dict.entry(key.clone())
            .or_insert_with(|| Value::Dict(Arc::new(Dict::new())));

        dict = match slot {
            Value::Dict(nested) => Arc::make_mut(nested),
            other => return err! {
                "conflicting site data entry",
                "key" => key,
                "existing entry" => other.kind(),
            },
        };
    }

    dict.insert(stem, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn files_are_keyed_by_stem_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("redirects.json"), r#"[{"path": "/old/"}]"#).unwrap();
        fs::create_dir(dir.path().join("nav")).unwrap();
        fs::write(dir.path().join("nav/footer.toml"), "label = \"Footer\"").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let data = load_dir(dir.path()).unwrap();
        assert_eq!(data.len(), 2);

        let redirects = data.get("redirects").and_then(Value::as_slice).unwrap();
        assert_eq!(redirects.len(), 1);

        let nav = data.get("nav").and_then(Value::as_dict).unwrap();
        let footer = nav.get("footer").and_then(Value::as_dict).unwrap();
        assert_eq!(footer.get("label").and_then(Value::as_str), Some("Footer"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("data");
        assert!(load_dir(&missing).is_err());
    }
}
