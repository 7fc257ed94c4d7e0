//! Loading referenced resources and remote locations

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::properties::{parse_properties, parse_yaml_properties, Properties};

/// Blocking access to referenced documents; no retries at this layer
pub trait ResourceLoader: Send + Sync + fmt::Debug {
    /// Read a resource path relative to the loader's roots
    fn load_resource(&self, path: &str) -> ConfigResult<String>;

    /// Read an absolute location (URL)
    fn load_location(&self, location: &str) -> ConfigResult<String>;
}

/// Resolves resource paths against an ordered list of root directories
#[derive(Debug, Clone)]
pub struct FileResourceLoader {
    roots: Vec<PathBuf>,
}

impl Default for FileResourceLoader {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
        }
    }
}

impl FileResourceLoader {
    /// Loader rooted at the current directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader with explicit roots, searched in order
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add_root(&mut self, root: impl Into<PathBuf>) {
        self.roots.push(root.into());
    }

    fn find(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
    }
}

impl ResourceLoader for FileResourceLoader {
    fn load_resource(&self, path: &str) -> ConfigResult<String> {
        let found = self.find(path).ok_or_else(|| ConfigError::Resource {
            location: path.to_string(),
            message: format!("not found under {} root(s)", self.roots.len()),
        })?;
        debug!(resource = path, file = %found.display(), "Loading resource");
        Ok(std::fs::read_to_string(found)?)
    }

    fn load_location(&self, location: &str) -> ConfigResult<String> {
        let url = Url::parse(location)?;
        debug!(location, scheme = url.scheme(), "Loading location");
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| ConfigError::Resource {
                    location: location.to_string(),
                    message: "not a local file path".to_string(),
                })?;
                Ok(std::fs::read_to_string(path)?)
            }
            "http" | "https" => fetch_remote(location),
            scheme => Err(ConfigError::Resource {
                location: location.to_string(),
                message: format!("unsupported scheme '{}'", scheme),
            }),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(location: &str) -> ConfigResult<String> {
    let resource_error = |e: reqwest::Error| ConfigError::Resource {
        location: location.to_string(),
        message: e.to_string(),
    };
    reqwest::blocking::get(location)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(resource_error)
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(location: &str) -> ConfigResult<String> {
    Err(ConfigError::Resource {
        location: location.to_string(),
        message: "remote locations require the 'remote' feature".to_string(),
    })
}

/// Parse a property document; YAML when the name says so, key=value otherwise
pub fn properties_from_document(name: &str, content: &str) -> ConfigResult<Properties> {
    let lowered = name.to_ascii_lowercase();
    if lowered.ends_with(".yaml") || lowered.ends_with(".yml") {
        parse_yaml_properties(content)
    } else {
        Ok(parse_properties(content))
    }
}
