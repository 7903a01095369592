//! Defines the site-wide [`Config`], loaded from `config.yml` at the root of
//! the source directory.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the configuration file in the source directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// A navigation entry. `path` is relative to the site root.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub path: String,
}

#[derive(Deserialize)]
struct Project {
    #[serde(default)]
    site_name: String,

    #[serde(default)]
    domain: String,

    #[serde(default)]
    author: String,

    #[serde(default)]
    footer: String,

    #[serde(default)]
    menu: Vec<MenuItem>,
}

/// Site-wide settings shared by every rendered page. Missing keys default to
/// empty values. A non-empty `domain` must produce a valid URL.
#[derive(Clone, Debug)]
pub struct Config {
    pub site_name: String,

    /// The site's host name without a scheme, e.g. `example.org`.
    pub domain: String,

    pub author: String,

    /// Footer contents. May contain markup, which is emitted verbatim.
    pub footer: String,

    pub menu: Vec<MenuItem>,

    /// `https://{domain}/`, or [`None`] without a `domain`, in which case
    /// URLs are root-relative.
    pub domain_url: Option<Url>,
}

impl Config {
    /// Loads `config.yml` from `dir`.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Err(Error::Missing(path));
        }
        let file = File::open(&path).map_err(|err| Error::Open {
            path: path.clone(),
            err,
        })?;
        Config::from_reader(file)
    }

    /// Parses a [`Config`] from YAML.
    pub fn from_reader<R: std::io::Read>(r: R) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(r)?;
        Ok(Config {
            domain_url: match project.domain.is_empty() {
                true => None,
                false => Some(Url::parse(&format!("https://{}/", project.domain))?),
            },
            site_name: project.site_name,
            domain: project.domain,
            author: project.author,
            footer: project.footer,
            menu: project.menu,
        })
    }

    /// The URL of the site root.
    pub fn site_url(&self) -> String {
        match &self.domain_url {
            Some(url) => url.to_string(),
            None => "/".to_owned(),
        }
    }

    /// Resolves a site-relative `path` (e.g., a [`MenuItem::path`] or a page
    /// path) against [`Config::domain_url`].
    pub fn url_for(&self, path: &str) -> std::result::Result<String, url::ParseError> {
        let path = path.trim_start_matches('/');
        match &self.domain_url {
            Some(url) => Ok(url.join(path)?.to_string()),
            None => Ok(format!("/{}", path)),
        }
    }
}

/// The result of a fallible configuration operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the [`Config`].
#[derive(Debug)]
pub enum Error {
    /// Returned when `config.yml` doesn't exist.
    Missing(PathBuf),

    /// Returned when `config.yml` exists but can't be opened.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when `config.yml` isn't valid YAML for a [`Config`].
    DeserializeYaml(serde_yaml::Error),

    /// Returned when a non-empty `domain` can't be turned into a URL.
    InvalidDomain(url::ParseError),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Missing(path) => {
                write!(f, "config file `{}` does not exist", path.display())
            }
            Error::Open { path, err } => {
                write!(f, "opening config file `{}`: {}", path.display(), err)
            }
            Error::DeserializeYaml(err) => {
                write!(f, "parsing config file: {}", err)
            }
            Error::InvalidDomain(err) => write!(f, "invalid domain: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Missing(_) => None,
            Error::Open { path: _, err } => Some(err),
            Error::DeserializeYaml(err) => Some(err),
            Error::InvalidDomain(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::InvalidDomain(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_reader() -> Result<()> {
        let config = Config::from_reader(
            "site_name: Notes
domain: example.org
author: Jane
footer: <em>bye</em>
menu:
  - title: Blog
    path: blog
  - title: About
    path: /about
"
            .as_bytes(),
        )?;

        assert_eq!("Notes", config.site_name);
        assert_eq!("Jane", config.author);
        assert_eq!("<em>bye</em>", config.footer);
        assert_eq!("https://example.org/", config.site_url());
        assert_eq!(2, config.menu.len());
        assert_eq!(
            "https://example.org/about",
            config.url_for(&config.menu[1].path)?
        );
        assert_eq!(
            "https://example.org/blog/post/",
            config.url_for("blog/post/")?
        );
        Ok(())
    }

    #[test]
    fn test_without_domain_urls_are_relative() -> Result<()> {
        let config = Config::from_reader("site_name: Notes\nauthor: Jane\n".as_bytes())?;
        assert_eq!("", config.domain);
        assert_eq!(None, config.domain_url);
        assert_eq!("/", config.site_url());
        assert_eq!("/blog/post/", config.url_for("/blog/post/")?);
        Ok(())
    }

    #[test]
    fn test_invalid_domain() {
        match Config::from_reader("domain: \"exa mple.org\"".as_bytes()) {
            Err(Error::InvalidDomain(_)) => {}
            other => panic!("wanted an invalid domain error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_keys_default() -> Result<()> {
        let config = Config::from_reader("domain: example.org".as_bytes())?;
        assert_eq!("", config.author);
        assert!(config.menu.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_yaml() {
        match Config::from_reader("menu: [".as_bytes()) {
            Err(Error::DeserializeYaml(_)) => {}
            other => panic!("wanted a YAML error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        match Config::from_directory(dir.path()) {
            Err(Error::Missing(path)) => {
                assert_eq!(dir.path().join(CONFIG_FILE_NAME), path)
            }
            other => panic!("wanted a missing file error, got {:?}", other),
        }
        Ok(())
    }
}
