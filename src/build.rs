//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: parsing the pages
//! ([`crate::site`]), rendering pages and listings ([`crate::write`]), and
//! copying the static assets into the output directory.

use crate::diagnostic::Diagnostic;
use crate::site::{Error as SiteError, Site};
use crate::theme::{Error as ThemeError, Theme};
use crate::write::{Error as WriteError, Writer};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// The directories a build reads from and writes to.
pub struct Config<'a> {
    /// The site's source directory (`config.yml`, `blog/`, pages, `images/`).
    pub source_directory: &'a Path,

    /// The theme directory: templates, `main.css`, and `icons/`.
    pub resource_directory: &'a Path,

    /// The root of the output tree. It's created if it doesn't exist; files
    /// already in it are overwritten but never deleted.
    pub output_directory: &'a Path,
}

/// Builds the site. This calls into [`Site::from_directory`] and
/// [`Writer::write_site`] which do the heavy-lifting.
/// This function also copies the static assets into the output directory.
/// Returns the recoverable problems found along the way.
pub fn build_site(config: &Config) -> Result<Vec<Diagnostic>> {
    let site = Site::from_directory(config.source_directory)?;
    let theme = Theme::from_directory(config.resource_directory)?;
    info!(
        pages = site.pages.len(),
        blog_pages = site.blog_pages.len(),
        "parsed site"
    );

    std::fs::create_dir_all(config.output_directory).map_err(|err| Error::Io {
        path: config.output_directory.to_owned(),
        err,
    })?;

    let writer = Writer {
        theme: &theme,
        config: &site.config,
        output_directory: config.output_directory,
    };
    writer.write_site(&site)?;

    // copy static assets
    copy_dir(
        &config.source_directory.join("images"),
        &config.output_directory.join("images"),
    )?;
    copy_dir(
        &config.resource_directory.join("main.css"),
        &config.output_directory.join("css").join("main.css"),
    )?;
    copy_dir(
        &config.resource_directory.join("icons"),
        &config.output_directory.join("icons"),
    )?;

    info!(output = %config.output_directory.display(), "website generated successfully");
    Ok(site.diagnostics)
}

/// Copies `src` to `dst`. `src` may be a file or a directory, which is copied
/// recursively. A missing `src` is skipped.
fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        debug!(path = %src.display(), "no static assets to copy");
        return Ok(());
    }

    for result in WalkDir::new(src) {
        let entry = result?;
        if entry.file_type().is_dir() {
            continue;
        }

        // strip_prefix shouldn't fail since `src` is always an ancestor of
        // (or equal to) the entry path
        let relative = entry.path().strip_prefix(src).unwrap_or_else(|_| Path::new(""));
        let target = match relative.as_os_str().is_empty() {
            true => dst.to_owned(),
            false => dst.join(relative),
        };
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir).map_err(|err| Error::Io {
                path: dir.to_owned(),
                err,
            })?;
        }
        std::fs::copy(entry.path(), &target).map_err(|err| Error::Io {
            path: target.clone(),
            err,
        })?;
    }
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing, loading
/// templates, writing, and copying static assets.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Site(SiteError),

    /// Returned for errors loading the templates.
    Theme(ThemeError),

    /// Returned for errors writing [`crate::page::Page`]s and listings to
    /// disk as HTML files.
    Write(WriteError),

    /// Returned for WalkDir I/O errors while copying static assets.
    WalkDir(walkdir::Error),

    /// Returned for other I/O errors.
    Io { path: PathBuf, err: std::io::Error },
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Site(err) => write!(f, "{}", err),
            Error::Theme(err) => write!(f, "{}", err),
            Error::Write(err) => write!(f, "{}", err),
            Error::WalkDir(err) => write!(f, "copying static assets: {}", err),
            Error::Io { path, err } => write!(f, "'{}': {}", path.display(), err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Site(err) => Some(err),
            Error::Theme(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

impl From<SiteError> for Error {
    /// Converts [`SiteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: SiteError) -> Error {
        Error::Site(err)
    }
}

impl From<ThemeError> for Error {
    fn from(err: ThemeError) -> Error {
        Error::Theme(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::site::test::{fixture, write_files};

    #[test]
    fn test_build_site() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let source = fixture()?;
        write_files(source.path(), &[("images/2024/cat.png", "meow")])?;
        let output = tempfile::tempdir()?;
        let resource = Path::new(env!("CARGO_MANIFEST_DIR")).join("resource");

        let diagnostics = build_site(&Config {
            source_directory: source.path(),
            resource_directory: &resource,
            output_directory: output.path(),
        })?;

        assert_eq!(1, diagnostics.len());
        for path in &[
            "index.html",
            "about/index.html",
            "blog/index.html",
            "blog/a/index.html",
            "blog/draft/index.html",
            "tags/a/index.html",
            "tags/b/index.html",
            "images/2024/cat.png",
            "css/main.css",
            "icons/favicon.svg",
        ] {
            assert!(output.path().join(path).is_file(), "missing {}", path);
        }
        assert_eq!(
            "meow",
            std::fs::read_to_string(output.path().join("images/2024/cat.png"))?
        );

        let mut top_level = std::fs::read_dir(output.path())?
            .map(|entry| -> std::io::Result<String> {
                Ok(entry?.file_name().to_string_lossy().into_owned())
            })
            .collect::<std::io::Result<Vec<String>>>()?;
        top_level.sort();
        assert_eq!(
            vec!["about", "blog", "css", "icons", "images", "index.html", "tags"],
            top_level
        );
        Ok(())
    }

    #[test]
    fn test_build_site_without_static_assets() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let source = fixture()?;
        let output = tempfile::tempdir()?;
        let resource = tempfile::tempdir()?;
        let bundled = Path::new(env!("CARGO_MANIFEST_DIR")).join("resource");
        for template in &[
            crate::theme::PAGE_TEMPLATE,
            crate::theme::LIST_TEMPLATE,
            crate::theme::HEADER_TEMPLATE,
            crate::theme::FOOTER_TEMPLATE,
            crate::theme::PAGE_METADATA_TEMPLATE,
            crate::theme::HEAD_TEMPLATE,
        ] {
            std::fs::copy(bundled.join(template), resource.path().join(template))?;
        }

        build_site(&Config {
            source_directory: source.path(),
            resource_directory: resource.path(),
            output_directory: output.path(),
        })?;
        assert!(!output.path().join("images").exists());
        assert!(!output.path().join("css").exists());
        assert!(output.path().join("index.html").is_file());
        Ok(())
    }

    #[test]
    fn test_build_error_message_names_file_and_cause() -> std::io::Result<()> {
        let source = fixture()?;
        write_files(source.path(), &[("blog/broken.md", "no header\n")])?;
        let output = tempfile::tempdir()?;
        let resource = Path::new(env!("CARGO_MANIFEST_DIR")).join("resource");
        match build_site(&Config {
            source_directory: source.path(),
            resource_directory: &resource,
            output_directory: output.path(),
        }) {
            Err(err) => {
                let message = err.to_string();
                assert!(message.contains("broken.md"), "{}", message);
                assert!(
                    message.contains("header does not start with `+++`"),
                    "{}",
                    message
                );
            }
            Ok(_) => panic!("wanted an error, got a site"),
        }
        Ok(())
    }

    #[test]
    fn test_build_site_invalid_input_writes_nothing() -> std::io::Result<()> {
        let source = tempfile::tempdir()?;
        let output = tempfile::tempdir()?;
        let output_directory = output.path().join("site");
        let resource = Path::new(env!("CARGO_MANIFEST_DIR")).join("resource");
        match build_site(&Config {
            source_directory: source.path(),
            resource_directory: &resource,
            output_directory: &output_directory,
        }) {
            Err(Error::Site(SiteError::InvalidInput(_))) => {}
            other => panic!("wanted invalid input, got {:?}", other),
        }
        assert!(!output_directory.exists());
        Ok(())
    }
}
