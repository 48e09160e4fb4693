//! Permalink patterns: URL templates with `:placeholder` substitution.

use crate::error::Result;
use crate::url::UrlBuf;
use crate::value::{Dict, Value};

/// Expands every `:name` token in `pattern` against `placeholders` and
/// collapses any duplicate `/` separators the substitution introduces.
///
/// ```rust
/// use signpost::permalink::expand;
/// use signpost::dict;
///
/// let placeholders = dict! {
///     "path" => "/learn/program",
///     "basename" => "index",
///     "output_ext" => ".html",
/// };
///
/// let url = expand("/:path/", &placeholders).unwrap();
/// assert_eq!(url.as_str(), "/learn/program/");
///
/// let url = expand("/:path/:basename:output_ext", &placeholders).unwrap();
/// assert_eq!(url.as_str(), "/learn/program/index.html");
///
/// assert!(expand("/:nonsense/", &placeholders).is_err());
/// ```
pub fn expand(pattern: &str, placeholders: &Dict) -> Result<UrlBuf> {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(i) = rest.find(':') {
        out.push_str(&rest[..i]);
        rest = &rest[i + 1..];

        let end = rest.find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());

        if end == 0 {
            out.push(':');
            continue;
        }

        let (key, tail) = rest.split_at(end);
        let value = placeholders.get(key).ok_or_else(|| error! {
            "unknown permalink placeholder",
            "placeholder" => key,
            "pattern" => pattern,
        })?;

        match value {
            Value::String(s) => out.push_str(s),
            Value::Int(v) => out.push_str(&v.to_string()),
            value => return err! {
                "permalink placeholder must expand to a string",
                "placeholder" => key,
                "found" => value.kind(),
            },
        }

        rest = tail;
    }

    out.push_str(rest);

    let mut url = String::with_capacity(out.len());
    for c in out.chars() {
        if c == '/' && url.ends_with('/') {
            continue;
        }

        url.push(c);
    }

    Ok(UrlBuf::from(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict;

    #[test]
    fn literal_patterns_pass_through() {
        let url = expand("/fixed/place/", &Dict::new()).unwrap();
        assert_eq!(url.as_str(), "/fixed/place/");
    }

    #[test]
    fn duplicate_slashes_collapse() {
        let placeholders = dict!["path" => "/learn/"];
        let url = expand("/:path/", &placeholders).unwrap();
        assert_eq!(url.as_str(), "/learn/");
    }

    #[test]
    fn non_string_placeholders_are_rejected() {
        let placeholders = dict!["parts" => Value::from(vec![Value::from(1)])];
        let error = expand("/:parts/", &placeholders).unwrap_err();
        assert!(error.to_string().contains("must expand to a string"));
    }

    #[test]
    fn lone_colon_is_literal() {
        let url = expand("/a:/b", &Dict::new()).unwrap();
        assert_eq!(url.as_str(), "/a:/b");
    }
}
