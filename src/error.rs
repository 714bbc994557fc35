use std::fmt::{Display, Formatter};

pub type Res<T = ()> = Result<T, Error>;
pub type ResContext<T = ()> = Result<T, Context<Error>>;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    CSV(csv::Error),
    Json(serde_json::Error),
    Profile(String),
    Replay(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IO(io) => Display::fmt(&io, f),
            Self::CSV(csv) => Display::fmt(&csv, f),
            Self::Json(json) => Display::fmt(&json, f),
            Self::Profile(reason) => f.write_fmt(format_args!("invalid profile: {reason}")),
            Self::Replay(reason) => f.write_fmt(format_args!("invalid replay: {reason}")),
        }
    }
}

impl std::error::Error for Error {}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::CSV(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::IO(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug)]
pub struct Context<T> {
    inner: T,
    context: String,
}

impl<T> Context<T> {
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Display> Display for Context<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Error {} : {}", self.context, self.inner))
    }
}

impl<T: std::fmt::Debug + Display> std::error::Error for Context<T> {}

pub trait HasContext<T, E> {
    fn context(self, f: impl Fn() -> String) -> Result<T, Context<E>>;

    fn context_str(self, s: &str) -> Result<T, Context<E>>
    where
        Self: Sized,
    {
        self.context(|| s.to_string())
    }
}

impl<T, E: Into<Error>> HasContext<T, Error> for Result<T, E> {
    fn context(self, f: impl Fn() -> String) -> Result<T, Context<Error>> {
        self.map_err(|inner| Context {
            inner: inner.into(),
            context: f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::error::{Error, HasContext, Res};

    fn missing() -> Res<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into())
    }

    #[test]
    fn test_context_wraps_message() {
        let err = missing().context(|| "opening profile.json".to_string()).unwrap_err();

        assert_matches!(err.inner(), Error::IO(_));
        assert_eq!(err.to_string(), "Error opening profile.json : gone");
    }

    #[test]
    fn test_profile_display() {
        let err = Error::Profile("object_ids is empty".to_string());
        assert_eq!(err.to_string(), "invalid profile: object_ids is empty");
    }
}
