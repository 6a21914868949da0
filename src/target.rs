//! Where to harvest from, as given on the command line.

use crate::FTPError;
use log::warn;
use url::{Host, Url};

pub const DEFAULT_URL: &str = "ftp://ftp.ncbi.nlm.nih.gov/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
    /// Remote directory the walk starts from.
    pub root: String,
}

impl Target {
    /// Parses `ftp://host[:port]/start-path`.
    ///
    /// Only anonymous login is supported, so credentials in the URL are
    /// ignored.
    pub fn parse(raw: &str) -> Result<Self, FTPError> {
        let url = Url::parse(raw).map_err(|_| FTPError::BadHost)?;

        if url.scheme() != "ftp" {
            return Err(FTPError::BadHost);
        }

        if !url.username().is_empty() || url.password().is_some() {
            warn!("Ignoring credentials in {}, logging in anonymously", raw);
        }

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_owned(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(FTPError::BadHost),
        };
        let port = url.port().unwrap_or(21);

        let root = match url.path() {
            "" => "/".to_owned(),
            path => path.to_owned(),
        };

        Ok(Target { host, port, root })
    }
}
