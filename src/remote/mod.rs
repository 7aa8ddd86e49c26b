//! Collaborators that talk to the outside world.
//!
//! The converter only needs [`Fetch`]: a way to turn a URL into bytes and a
//! media type. [`HttpFetcher`] does it over HTTPS; [`DriveClient`] builds the
//! Drive metadata and export requests on top of any fetcher.

mod drive;
mod http;

pub use drive::{DriveClient, DriveFile};
pub use http::{DEFAULT_TIMEOUT, HttpFetcher, USER_AGENT};

use crate::error::Result;

/// A downloaded resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub body: Vec<u8>,
    /// Media type without parameters, lower-cased (`image/png`).
    pub content_type: Option<String>,
}

/// Retrieval of remote resources. Any error aborts the conversion.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<Fetched>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        (**self).fetch(url)
    }
}
