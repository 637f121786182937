use crate::config::Config;
use crate::error::TransportError;
use crate::http;
use crate::image_reference::ImageReference;
use reqwest::Url;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// Where the registry host comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistrySource<'a> {
    /// Configured host, queried over http without a token
    Explicit(&'a str),
    /// Host and token resolved through the index, queried over https
    Index,
}

impl<'a> RegistrySource<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        match config.registry.as_deref() {
            Some(host) if !host.is_empty() => RegistrySource::Explicit(host),
            _ => RegistrySource::Index,
        }
    }
}

/// The single request the tag lookup issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryTarget {
    pub scheme: Scheme,
    pub host: String,
    /// Unescaped path segments
    pub path: Vec<String>,
}

impl RegistryTarget {
    pub fn direct(host: &str, image: &ImageReference) -> Self {
        Self {
            scheme: Scheme::Http,
            host: host.to_string(),
            path: image.latest_tag_path().into_iter().map(str::to_string).collect(),
        }
    }

    pub fn resolved(host: &str, image: &ImageReference) -> Self {
        Self {
            scheme: Scheme::Https,
            host: host.to_string(),
            path: image.latest_tag_path().into_iter().map(str::to_string).collect(),
        }
    }

    pub fn url(&self) -> Result<Url, TransportError> {
        let base = format!("{}://{}", self.scheme, self.host);
        if self.host.is_empty() {
            return Err(TransportError::InvalidUrl {
                url: base,
                reason: "registry host is empty".to_string(),
            });
        }
        let base = Url::parse(&base).map_err(|e| TransportError::InvalidUrl {
            url: base,
            reason: e.to_string(),
        })?;
        http::append_path(&base, &self.path)
    }
}
