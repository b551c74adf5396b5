use log::{debug, info, warn};
use reqwest::blocking::Client;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Url;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{failure, Result};
use crate::xml::XmlDocument;

/// Raw result of a successful fixture request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
    /// Set when the transport already parsed the body as a document.
    pub document: Option<XmlDocument>,
}

/// Issues one blocking request per call. Implementations must not return
/// until the fixture is fully available or the request has failed.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Response>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str) -> Result<Response> {
        (**self).fetch(url)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str) -> Result<Response> {
        (**self).fetch(url)
    }
}

/// 2xx and 304 count as success.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status) || status == 304
}

/// `text/xml`, `application/xml` and any `+xml` media type.
pub fn is_xml_media_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/xml" || mime == "application/xml" || mime.ends_with("+xml")
}

/// Fetches fixtures over HTTP with `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    origin: Option<Url>,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Fetcher for absolute fixture URLs.
    pub fn new() -> Self {
        HttpFetcher {
            client: Client::new(),
            origin: None,
        }
    }

    /// Fetcher that resolves relative fixture URLs against `origin`.
    pub fn with_origin(origin: Url) -> Self {
        HttpFetcher {
            client: Client::new(),
            origin: Some(origin),
        }
    }

    fn target(&self, url: &str) -> Option<Url> {
        match &self.origin {
            Some(origin) => origin.join(url).ok(),
            None => Url::parse(url).ok(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Response> {
        let target = match self.target(url) {
            Some(target) => target,
            None => {
                warn!("Cannot build a request URL for fixture {}", url);
                return Err(failure(url, 0));
            }
        };

        info!("Fetching fixture {}", target);
        let response = self
            .client
            .get(target)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .map_err(|e| {
                warn!("Request for fixture {} failed: {}", url, e);
                failure(url, 0)
            })?;

        let status = response.status().as_u16();
        if !is_success(status) {
            warn!("Fixture {} answered with status {}", url, status);
            return Err(failure(url, status));
        }

        let declares_xml = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, is_xml_media_type);

        let body = response.text().map_err(|e| {
            warn!("Failed to read body of fixture {}: {}", url, e);
            failure(url, 0)
        })?;

        let document = if declares_xml {
            parse_document(url, &body)
        } else {
            None
        };

        Ok(Response {
            status,
            body,
            document,
        })
    }
}

/// Reads fixtures from a directory, answering with HTTP-like statuses.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FileFetcher {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Response> {
        let path = self.root.join(url.trim_start_matches('/'));
        info!("Reading fixture {}", path.display());

        let body = fs::read_to_string(&path).map_err(|e| {
            let status = match e.kind() {
                ErrorKind::NotFound => 404,
                ErrorKind::PermissionDenied => 403,
                _ => 0,
            };
            warn!("Failed to read fixture {}: {}", path.display(), e);
            failure(url, status)
        })?;

        let is_xml = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"));
        let document = if is_xml {
            parse_document(url, &body)
        } else {
            None
        };

        Ok(Response {
            status: 200,
            body,
            document,
        })
    }
}

fn parse_document(url: &str, body: &str) -> Option<XmlDocument> {
    match XmlDocument::parse(body) {
        Ok(document) => Some(document),
        Err(e) => {
            debug!("Fixture {} declared XML but did not parse: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(is_success(200));
        assert!(is_success(204));
        assert!(is_success(299));
        assert!(is_success(304));
        assert!(!is_success(300));
        assert!(!is_success(301));
        assert!(!is_success(404));
        assert!(!is_success(500));
        assert!(!is_success(0));
    }

    #[test]
    fn test_is_xml_media_type() {
        assert!(is_xml_media_type("text/xml"));
        assert!(is_xml_media_type("application/xml; charset=utf-8"));
        assert!(is_xml_media_type("image/svg+xml"));
        assert!(is_xml_media_type("Application/XML"));
        assert!(!is_xml_media_type("text/html"));
        assert!(!is_xml_media_type("application/json"));
        assert!(!is_xml_media_type(""));
    }

    #[test]
    fn test_relative_url_without_origin_fails_with_status_zero() {
        let fetcher = HttpFetcher::new();
        let err = fetcher.fetch("fixtures/first.htm").unwrap_err();
        assert_eq!(err.status(), Some(0));
        assert_eq!(
            err.to_string(),
            "Failed to retrieve fixture at: fixtures/first.htm (status: 0)"
        );
    }
}
