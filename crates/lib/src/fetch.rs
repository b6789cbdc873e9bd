//! Byte-stream fetching for manifests and component archives.
//!
//! Everything that touches the network goes through the [`Fetcher`] trait so
//! the resolution and install logic can be exercised without a server.

use std::io::{self, Write};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::FETCH_TIMEOUT;

/// Errors that can occur while fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The request could not be sent or the connection failed.
  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// Reading the body or writing it to the sink failed.
  #[error("failed to transfer {url}: {source}")]
  Io {
    url: String,
    #[source]
    source: io::Error,
  },
}

/// A black-box provider of byte streams.
pub trait Fetcher {
  /// Stream the body at `url` into `sink`, returning the number of bytes written.
  fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// Blocking HTTP fetcher with a fixed per-call timeout.
pub struct HttpFetcher {
  client: reqwest::blocking::Client,
}

impl HttpFetcher {
  /// Create a fetcher using the default timeout.
  pub fn new() -> Result<Self, FetchError> {
    Self::with_timeout(FETCH_TIMEOUT)
  }

  /// Create a fetcher whose calls give up after `timeout`.
  pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
    let client = reqwest::blocking::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("fpm/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|source| FetchError::Transport {
        url: String::new(),
        source,
      })?;
    Ok(Self { client })
  }
}

impl Fetcher for HttpFetcher {
  fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
    info!(url = %url, "fetching URL");

    let mut response = self.client.get(url).send().map_err(|source| FetchError::Transport {
      url: url.to_string(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let written = io::copy(&mut response, sink).map_err(|source| FetchError::Io {
      url: url.to_string(),
      source,
    })?;

    debug!(url = %url, bytes = written, "fetch complete");
    Ok(written)
  }
}

/// Fetch the whole body at `url` into memory.
pub fn fetch_bytes(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<u8>, FetchError> {
  let mut body = Vec::new();
  fetcher.fetch(url, &mut body)?;
  Ok(body)
}
