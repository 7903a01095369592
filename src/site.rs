//! Defines the [`Site`] type and the logic for building it from a source
//! directory. See [`Site::from_directory`] for the expected layout.

use crate::config::{self, Config};
use crate::diagnostic::Diagnostic;
use crate::page::{self, Page, BLOG_PREFIX};
use std::fmt;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const MARKDOWN_EXTENSION: &str = ".md";

/// All of the pages of a site, parsed into memory.
pub struct Site {
    /// Regular pages in traversal order.
    pub pages: Vec<Page>,

    /// Blog pages, most recent first. Undated pages come last; pages with the
    /// same date keep their traversal order.
    pub blog_pages: Vec<Page>,

    pub input_directory: PathBuf,

    pub config: Config,

    /// Recoverable problems found while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl Site {
    /// Builds a [`Site`] from `input_directory`, which must contain a
    /// `config.yml` file and a `blog` directory. Every `.md` file below it is
    /// parsed into a [`Page`]; files below `blog` become blog pages. Each
    /// file must be structured as follows:
    ///
    /// 1. Initial front matter delimiter (`+++`)
    /// 2. `key = value` lines, e.g. `title`, `date`, and `tags`
    /// 3. Terminal front matter delimiter (`+++`)
    /// 4. Markdown body
    ///
    /// For example:
    ///
    /// ```md
    /// +++
    /// title = "Hello, world!"
    /// date = 2021-04-16
    /// tags = [greet]
    /// +++
    /// World
    /// ```
    ///
    /// The first file that fails to parse aborts the build.
    pub fn from_directory(input_directory: &Path) -> Result<Site> {
        validate_input_directory(input_directory)?;
        let config = Config::from_directory(input_directory)?;

        let mut pages = Vec::new();
        let mut blog_pages = Vec::new();
        let mut diagnostics = Vec::new();
        for result in
            WalkDir::new(input_directory).sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = result?;
            if !entry.file_type().is_file()
                || !entry
                    .file_name()
                    .to_string_lossy()
                    .ends_with(MARKDOWN_EXTENSION)
            {
                continue;
            }

            let page = parse_page(input_directory, entry.path(), &mut diagnostics)
                .map_err(|e| {
                    Error::Annotated(format!("parsing page `{}`", entry.path().display()), Box::new(e))
                })?;
            match page {
                Some(page) if page.is_blog_page() => blog_pages.push(page),
                Some(page) => pages.push(page),
                None => {}
            }
        }

        // `sort_by` is stable, so pages with equal dates keep traversal order.
        blog_pages.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

        Ok(Site {
            pages,
            blog_pages,
            input_directory: input_directory.to_owned(),
            config,
            diagnostics,
        })
    }

    /// Every page, regular pages first.
    pub fn all_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().chain(self.blog_pages.iter())
    }
}

/// Checks that `dir` is a directory with a `blog` subdirectory.
pub fn validate_input_directory(dir: &Path) -> Result<()> {
    let metadata = std::fs::metadata(dir)
        .map_err(|e| Error::InvalidInput(format!("accessing `{}`: {}", dir.display(), e)))?;
    if !metadata.is_dir() {
        return Err(Error::InvalidInput(format!(
            "`{}` is not a directory",
            dir.display()
        )));
    }
    if !dir.join(BLOG_PREFIX).is_dir() {
        return Err(Error::InvalidInput(format!(
            "`{}` has no `{}` directory",
            dir.display(),
            BLOG_PREFIX
        )));
    }
    Ok(())
}

fn parse_page(
    input_directory: &Path,
    source_path: &Path,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Option<Page>> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(source_path)?.read_to_string(&mut contents)?;

    let path = page_path(input_directory, source_path)?;
    debug!(path = %path, "parsing page");
    Ok(Page::parse(source_path, path, contents, diagnostics)?)
}

/// Computes the page path for `source_path`: the path relative to
/// `input_directory`, `/`-separated, without the `.md` extension.
pub fn page_path(input_directory: &Path, source_path: &Path) -> Result<String> {
    let invalid = || InvalidFileNameError(source_path.to_owned());
    let relative = source_path
        .strip_prefix(input_directory)
        .map_err(|_| invalid())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str().ok_or_else(invalid)?),
            _ => return Err(invalid().into()),
        }
    }

    let joined = segments.join("/");
    Ok(match joined.strip_suffix(MARKDOWN_EXTENSION) {
        Some(stripped) => stripped.to_owned(),
        None => joined,
    })
}

#[derive(Debug)]
pub struct InvalidFileNameError(PathBuf);

impl fmt::Display for InvalidFileNameError {
    /// Displays an [`InvalidFileNameError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid file name: {:?}", &self.0)
    }
}

impl std::error::Error for InvalidFileNameError {
    /// Implements the [`std::error::Error`] trait for [`InvalidFileNameError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

/// Represents the result of a [`Site`]-building operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error building a [`Site`].
#[derive(Debug)]
pub enum Error {
    /// Returned when the source directory doesn't exist, isn't a directory,
    /// or has no `blog` directory.
    InvalidInput(String),

    /// Returned when `config.yml` is missing or invalid.
    Config(config::Error),

    /// Returned when a page doesn't begin with the front matter delimiter.
    MalformedHeader,

    /// Returned when a page has no closing front matter delimiter.
    HeaderEndNotFound,

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(InvalidFileNameError),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            Error::Config(err) => write!(f, "{}", err),
            Error::MalformedHeader => {
                write!(f, "{}", crate::header::Error::MalformedHeader)
            }
            Error::HeaderEndNotFound => {
                write!(f, "{}", crate::content::Error::HeaderEndNotFound)
            }
            Error::Io(err) => write!(f, "{}", err),
            Error::WalkDir(err) => write!(f, "{}", err),
            Error::InvalidFileName(err) => write!(f, "{}", err),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidInput(_) => None,
            Error::Config(err) => Some(err),
            Error::MalformedHeader => None,
            Error::HeaderEndNotFound => None,
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::InvalidFileName(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<config::Error> for Error {
    fn from(err: config::Error) -> Error {
        Error::Config(err)
    }
}

impl From<page::Error> for Error {
    fn from(err: page::Error) -> Error {
        match err {
            page::Error::Header(_) => Error::MalformedHeader,
            page::Error::Content(_) => Error::HeaderEndNotFound,
        }
    }
}

impl From<InvalidFileNameError> for Error {
    fn from(err: InvalidFileNameError) -> Error {
        Error::InvalidFileName(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for directory traversal.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::fs;

    pub(crate) const CONFIG: &str = "site_name: Notes
domain: example.org
author: Jane
footer: Bye
menu:
  - title: Blog
    path: blog
";

    /// Writes `files` (relative path, contents) below `dir`.
    pub(crate) fn write_files(dir: &Path, files: &[(&str, &str)]) -> std::io::Result<()> {
        for (path, contents) in files {
            let path = dir.join(path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        Ok(())
    }

    /// A small source directory with a main page, a regular page, and three
    /// blog pages out of date order.
    pub(crate) fn fixture() -> std::io::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        write_files(
            dir.path(),
            &[
                ("config.yml", CONFIG),
                ("index.md", "+++\ntitle = Home\n+++\nWelcome.\n"),
                ("about.md", "+++\ntitle = \"About\"\n+++\nMe.\n"),
                ("notes.txt", "not markdown"),
                (
                    "blog/a.md",
                    "+++\ntitle = January\ndate = 2024-01-01\ntags = [a]\n+++\nOne.\n",
                ),
                (
                    "blog/b.md",
                    "+++\ntitle = March\ndate = 2024-03-01\ntags = [a, b]\n+++\nTwo.\n",
                ),
                (
                    "blog/c.md",
                    "+++\ntitle = February\ndate = 2024-02-01\noops\n+++\nThree.\n",
                ),
                ("blog/draft.md", "+++\ntitle = Draft\n+++\nLater.\n"),
            ],
        )?;
        Ok(dir)
    }

    #[test]
    fn test_from_directory() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = fixture()?;
        let site = Site::from_directory(dir.path())?;

        let paths: Vec<&str> = site.pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(vec!["about", "index"], paths);

        let titles: Vec<&str> = site.blog_pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(vec!["March", "February", "January", "Draft"], titles);
        assert_eq!(0, site.blog_pages[3].publish_timestamp());

        assert_eq!(1, site.diagnostics.len());
        assert_eq!(dir.path().join("blog/c.md"), site.diagnostics[0].path);
        assert_eq!("Jane", site.config.author);
        assert_eq!(6, site.all_pages().count());
        Ok(())
    }

    #[test]
    fn test_equal_dates_keep_traversal_order() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        write_files(
            dir.path(),
            &[
                ("config.yml", CONFIG),
                ("blog/x.md", "+++\ntitle = X\ndate = 2024-01-01\n+++\nx\n"),
                ("blog/y.md", "+++\ntitle = Y\ndate = 2024-01-01\n+++\ny\n"),
                ("blog/z.md", "+++\ntitle = Z\ndate = 2024-01-01\n+++\nz\n"),
            ],
        )?;
        let site = Site::from_directory(dir.path())?;
        let titles: Vec<&str> = site.blog_pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(vec!["X", "Y", "Z"], titles);
        Ok(())
    }

    #[test]
    fn test_invalid_input() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        match Site::from_directory(&dir.path().join("missing")) {
            Err(Error::InvalidInput(_)) => {}
            Err(e) => panic!("wanted invalid input, got {}", e),
            Ok(_) => panic!("wanted invalid input, got a site"),
        }

        write_files(dir.path(), &[("config.yml", CONFIG)])?;
        match Site::from_directory(&dir.path().join("config.yml")) {
            Err(Error::InvalidInput(_)) => {}
            Err(e) => panic!("wanted invalid input, got {}", e),
            Ok(_) => panic!("wanted invalid input, got a site"),
        }
        match Site::from_directory(dir.path()) {
            Err(Error::InvalidInput(_)) => {}
            Err(e) => panic!("wanted invalid input, got {}", e),
            Ok(_) => panic!("wanted invalid input, got a site"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_config() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("blog"))?;
        match Site::from_directory(dir.path()) {
            Err(Error::Config(config::Error::Missing(_))) => {}
            Err(e) => panic!("wanted a missing config, got {}", e),
            Ok(_) => panic!("wanted a missing config, got a site"),
        }
        Ok(())
    }

    #[test]
    fn test_malformed_page_aborts() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        write_files(
            dir.path(),
            &[
                ("config.yml", CONFIG),
                ("blog/ok.md", "+++\ntitle = Ok\n+++\nFine.\n"),
                ("blog/unterminated.md", "+++\ntitle = Oops\nbody\n"),
            ],
        )?;
        match Site::from_directory(dir.path()) {
            Err(Error::Annotated(_, err)) => match *err {
                Error::HeaderEndNotFound => {}
                e => panic!("wanted a missing header end, got {}", e),
            },
            Err(e) => panic!("wanted an annotated error, got {}", e),
            Ok(_) => panic!("wanted an error, got a site"),
        }

        write_files(dir.path(), &[("blog/unterminated.md", "no header\n")])?;
        match Site::from_directory(dir.path()) {
            Err(Error::Annotated(_, err)) => match *err {
                Error::MalformedHeader => {}
                e => panic!("wanted a malformed header, got {}", e),
            },
            Err(e) => panic!("wanted an annotated error, got {}", e),
            Ok(_) => panic!("wanted an error, got a site"),
        }
        Ok(())
    }

    #[test]
    fn test_page_path() -> Result<()> {
        let root = Path::new("/src");
        assert_eq!("index", page_path(root, &root.join("index.md"))?);
        assert_eq!("blog/2024/post", page_path(root, &root.join("blog/2024/post.md"))?);
        assert_eq!("notes.md", page_path(root, &root.join("notes.md.md"))?);
        Ok(())
    }
}
