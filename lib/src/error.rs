use std::{fmt, io};
use std::panic::Location;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error with keyed context parameters and a chain of causes.
///
/// Constructed via [`error!`]/[`err!`] or any of the `From` conversions, and
/// extended with [`Chainable`] as errors bubble up.
#[derive(Debug)]
pub struct Error {
    message: String,
    params: Vec<(Option<String>, String)>,
    cause: Option<Box<Error>>,
    location: &'static Location<'static>,
}

impl Error {
    #[track_caller]
    pub fn new<M: fmt::Display>(message: M) -> Self {
        Error {
            message: message.to_string(),
            params: vec![],
            cause: None,
            location: Location::caller(),
        }
    }

    /// Attaches a `key: value` context parameter.
    pub fn with<K: fmt::Display, V: fmt::Display>(mut self, key: K, value: V) -> Self {
        self.params.push((Some(key.to_string()), value.to_string()));
        self
    }

    /// Attaches an unkeyed context line.
    pub fn note<V: fmt::Display>(mut self, value: V) -> Self {
        self.params.push((None, value.to_string()));
        self
    }

    /// Chains `self` as the root cause of `other`.
    pub fn chain(self, mut other: Error) -> Self {
        fn attach(error: Error, behind: &mut Error) {
            match behind.cause.as_mut() {
                Some(cause) => attach(error, cause),
                None => behind.cause = Some(Box::new(error)),
            }
        }

        attach(self, &mut other);
        other
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn render(e: &Error, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let pad = "  ".repeat(depth);
            writeln!(f, "{pad}{}", e.message)?;
            for (key, value) in &e.params {
                let value = value.replace('\n', &format!("\n{pad}  "));
                match key {
                    Some(key) => writeln!(f, "{pad}  {key}: {value}")?,
                    None => writeln!(f, "{pad}  {value}")?,
                }
            }

            if std::env::var_os("RUST_BACKTRACE").is_some() {
                writeln!(f, "{pad}  [{}]", e.location)?;
            }

            match &e.cause {
                Some(cause) => render(cause, depth + 1, f),
                None => Ok(()),
            }
        }

        render(self, 0, f)
    }
}

impl From<String> for Error {
    #[track_caller]
    fn from(message: String) -> Self {
        Error::new(message)
    }
}

impl From<&str> for Error {
    #[track_caller]
    fn from(message: &str) -> Self {
        Error::new(message)
    }
}

macro_rules! impl_from_std_error {
    ($($T:ty),+ $(,)?) => ($(
        impl From<$T> for $crate::error::Error {
            #[track_caller]
            fn from(error: $T) -> Self {
                let mut e = $crate::error::Error::new(&error);
                let mut source = std::error::Error::source(&error);
                while let Some(s) = source {
                    e = e.note(s);
                    source = s.source();
                }

                e
            }
        }
    )+)
}

impl_from_std_error!(io::Error, toml::de::Error, serde_json::Error, jwalk::Error);

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($msg:expr $(, $($rest:tt)*)?) => ({
        #[allow(unused_mut)]
        let mut e = $crate::error::Error::new($msg);
        $($crate::error!(@param e $($rest)*);)?
        e
    });

    (@param $e:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $e = $e.with($key, $value);
        $crate::error!(@param $e $($rest)*);
    };

    (@param $e:ident $key:expr => $value:expr) => {
        $e = $e.with($key, $value);
    };

    (@param $e:ident $value:expr, $($rest:tt)*) => {
        $e = $e.note($value);
        $crate::error!(@param $e $($rest)*);
    };

    (@param $e:ident $value:expr) => {
        $e = $e.note($value);
    };

    (@param $e:ident) => { };
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into())),
        }
    }

    fn chain_with<F, E2>(self, f: F) -> Result<T>
        where F: FnOnce() -> E2, E2: Into<Error>
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into())),
        }
    }
}
