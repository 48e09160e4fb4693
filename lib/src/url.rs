use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An owned, growable URL string with scheme-aware joining.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UrlBuf(String);

impl UrlBuf {
    pub fn new() -> UrlBuf {
        UrlBuf(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The URL's scheme, if it has one.
    ///
    /// ```rust
    /// use signpost::url::UrlBuf;
    ///
    /// assert_eq!(UrlBuf::from("http://example.org").scheme(), Some("http"));
    /// assert_eq!(UrlBuf::from("mailto:foo@bar.com").scheme(), Some("mailto"));
    /// assert_eq!(UrlBuf::from("/learn/program/").scheme(), None);
    /// assert_eq!(UrlBuf::from("foo?bar:baz").scheme(), None);
    /// ```
    pub fn scheme(&self) -> Option<&str> {
        let bytes = self.0.as_bytes();
        match memchr::memchr3(b':', b'?', b'/', bytes) {
            Some(i) if bytes[i] == b':' => match memchr::memrchr(b'#', &bytes[..i]) {
                Some(_) => None,
                None => Some(&self.0[..i]),
            },
            _ => None,
        }
    }

    /// Appends `url`, inserting a single `/` separator. An absolute `url`
    /// (one with a scheme) replaces `self` entirely.
    ///
    /// ```rust
    /// use signpost::url::UrlBuf;
    ///
    /// let mut url = UrlBuf::from("https://example.org");
    /// url.append("bar/baz");
    /// assert_eq!(url.as_str(), "https://example.org/bar/baz");
    ///
    /// url.append("/foo/");
    /// assert_eq!(url.as_str(), "https://example.org/bar/baz/foo/");
    ///
    /// url.append("https://rwf2.org/foo");
    /// assert_eq!(url.as_str(), "https://rwf2.org/foo");
    /// ```
    pub fn append<T: AsRef<str>>(&mut self, url: T) -> &mut Self {
        let url = url.as_ref();
        if UrlBuf::from(url).scheme().is_some() {
            self.0 = url.to_string();
        } else {
            match (self.0.ends_with('/'), url.starts_with('/')) {
                (true, true) => self.0.push_str(&url[1..]),
                (true, false) | (false, true) => self.0.push_str(url),
                (false, false) => {
                    self.0.push('/');
                    self.0.push_str(url);
                }
            }
        }

        self
    }

    /// Prepends `url`. Does nothing if `self` already has a scheme.
    ///
    /// ```rust
    /// use signpost::url::UrlBuf;
    ///
    /// let mut url = UrlBuf::from("foo/bar");
    /// url.prepend("/");
    /// assert_eq!(url.as_str(), "/foo/bar");
    ///
    /// url.prepend("https://example.org");
    /// assert_eq!(url.as_str(), "https://example.org/foo/bar");
    ///
    /// url.prepend("/bar/baz");
    /// assert_eq!(url.as_str(), "https://example.org/foo/bar");
    /// ```
    pub fn prepend<T: AsRef<str>>(&mut self, url: T) -> &mut Self {
        if self.scheme().is_some() {
            return self;
        }

        let mut base = UrlBuf::from(url.as_ref());
        let suffix = std::mem::take(self);
        if !suffix.is_empty() {
            base.append(suffix.as_str());
        }

        *self = base;
        self
    }

    pub fn extend<T: AsRef<str>, I: IntoIterator<Item = T>>(&mut self, iter: I) -> &mut Self {
        for url in iter.into_iter() {
            self.append(url.as_ref());
        }

        self
    }

    pub fn make_absolute(&mut self) -> &mut Self {
        self.prepend("/");
        self
    }

    /// Strips the scheme and authority (or any leading slashes), leaving the
    /// path-relative part.
    ///
    /// ```rust
    /// use signpost::url::UrlBuf;
    ///
    /// let mut url = UrlBuf::from("https://example.org/foo/bar");
    /// url.make_relative();
    /// assert_eq!(url.as_str(), "foo/bar");
    ///
    /// let mut url = UrlBuf::from("/foo/bar");
    /// url.make_relative();
    /// assert_eq!(url.as_str(), "foo/bar");
    /// ```
    pub fn make_relative(&mut self) -> &mut Self {
        let relative = match self.scheme() {
            Some(scheme) => {
                let rest = self.0[scheme.len() + 1..].trim_start_matches('/');
                match rest.find('/') {
                    Some(i) => rest[i + 1..].to_string(),
                    None => String::new(),
                }
            }
            None => self.0.trim_start_matches('/').to_string(),
        };

        self.0 = relative;
        self
    }
}

impl From<String> for UrlBuf {
    fn from(value: String) -> Self {
        UrlBuf(value)
    }
}

impl From<&str> for UrlBuf {
    fn from(value: &str) -> Self {
        UrlBuf(value.to_string())
    }
}

impl Deref for UrlBuf {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for UrlBuf {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for UrlBuf {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UrlBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<U: AsRef<str>> FromIterator<U> for UrlBuf {
    fn from_iter<T: IntoIterator<Item = U>>(iter: T) -> Self {
        let mut url = UrlBuf::new();
        url.extend(iter);
        url
    }
}

impl From<UrlBuf> for String {
    fn from(value: UrlBuf) -> Self {
        value.0
    }
}

impl From<UrlBuf> for Arc<str> {
    fn from(value: UrlBuf) -> Self {
        Arc::from(value.0.into_boxed_str())
    }
}
