use std::fmt::Display;

use miette::miette;

#[derive(Debug)]
pub enum Error {
    /// The sampler could not find a non-overlapping interval
    /// within its attempt budget. Recoverable: the caller is
    /// expected to skip the duration and move on.
    NoFreeInterval,

    Miette(miette::Report),
}

impl From<miette::Report> for Error {
    fn from(err: miette::Report) -> Self {
        Error::Miette(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Miette(miette::Report::msg(err))
    }
}

impl From<Error> for miette::Report {
    fn from(err: Error) -> Self {
        match err {
            Error::NoFreeInterval => miette!("No non-overlapping interval found"),
            Error::Miette(err) => err,
        }
    }
}

impl Error {
    pub fn wrap_err_with<D, F>(self, f: F) -> Error
    where
        D: Display + Send + Sync + 'static,
        F: FnOnce() -> D,
    {
        match self {
            Error::Miette(report) => Error::Miette(report.wrap_err(f())),
            err => err,
        }
    }
}

pub fn err_msg<D>(msg: D) -> Error
where
    D: Display + Send + Sync + 'static,
{
    Error::Miette(miette!("{msg}"))
}

pub fn bail<T, D>(msg: D) -> Result<T>
where
    D: Display + Send + Sync + 'static,
{
    Err(err_msg(msg))
}

pub type Result<T> = std::result::Result<T, Error>;
