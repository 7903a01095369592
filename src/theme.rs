//! Defines the [`Theme`], the set of templates pages and listings are rendered
//! with, along with the data each template receives. Templates use Go's
//! template syntax (via [`gtmpl`]). The page and listing templates receive
//! the header, footer, and `<head>` metadata pre-rendered as HTML strings.

use gtmpl::{Context, Template, Value};
use gtmpl_derive::Gtmpl;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const PAGE_TEMPLATE: &str = "template.html";
pub const LIST_TEMPLATE: &str = "list.html";
pub const HEADER_TEMPLATE: &str = "header.html";
pub const FOOTER_TEMPLATE: &str = "footer.html";
pub const PAGE_METADATA_TEMPLATE: &str = "page-metadata.html";
pub const HEAD_TEMPLATE: &str = "head.html";

/// A link in the site navigation.
#[derive(Gtmpl, Clone)]
pub struct MenuLink {
    pub title: String,
    pub url: String,
}

/// Data for the site header. `menu` is an array of [`MenuLink`] values.
#[derive(Gtmpl)]
pub struct HeaderData {
    pub domain_url: String,
    pub menu: Value,
}

#[derive(Gtmpl)]
pub struct FooterData {
    pub data: String,
}

/// Data for the `<head>` element.
#[derive(Gtmpl)]
pub struct HeadData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub domain_url: String,
    pub canonical_url: String,
}

/// A link to a tag listing.
#[derive(Gtmpl, Clone)]
pub struct TagLink {
    pub name: String,
    pub url: String,
}

/// Data for the publish date and tag links shown on dated pages. `tags` is
/// an array of [`TagLink`] values.
#[derive(Gtmpl)]
pub struct PageMetadataData {
    pub publish_date: String,
    pub tags: Value,
}

/// Data for a single page. Every field except `content` and `main_page` is
/// pre-rendered HTML from the partial templates.
#[derive(Gtmpl)]
pub struct PageData {
    pub header: String,
    pub content: String,
    pub footer: String,
    pub page_details: String,
    pub head_metadata: String,
    pub main_page: bool,
}

/// One entry in a listing.
#[derive(Gtmpl, Clone)]
pub struct ListItem {
    pub title: String,
    pub url: String,
    pub date: String,
}

/// Data for a listing page. `pages` is an array of [`ListItem`] values.
#[derive(Gtmpl)]
pub struct ListData {
    pub title: String,
    pub header: String,
    pub pages: Value,
    pub footer: String,
    pub head_metadata: String,
}

/// Converts items into a template array.
pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Value {
    Value::Array(items.into_iter().map(Into::into).collect())
}

/// The parsed templates of a theme directory.
pub struct Theme {
    page: Template,
    list: Template,
    header: Template,
    footer: Template,
    page_metadata: Template,
    head: Template,
}

impl Theme {
    /// Loads and parses every template from `dir`.
    pub fn from_directory(dir: &Path) -> Result<Theme> {
        Ok(Theme {
            page: parse_template(&dir.join(PAGE_TEMPLATE))?,
            list: parse_template(&dir.join(LIST_TEMPLATE))?,
            header: parse_template(&dir.join(HEADER_TEMPLATE))?,
            footer: parse_template(&dir.join(FOOTER_TEMPLATE))?,
            page_metadata: parse_template(&dir.join(PAGE_METADATA_TEMPLATE))?,
            head: parse_template(&dir.join(HEAD_TEMPLATE))?,
        })
    }

    pub fn render_page(&self, data: PageData) -> Result<String> {
        render(&self.page, data)
    }

    pub fn render_list(&self, data: ListData) -> Result<String> {
        render(&self.list, data)
    }

    pub fn render_header(&self, data: HeaderData) -> Result<String> {
        render(&self.header, data)
    }

    pub fn render_footer(&self, data: FooterData) -> Result<String> {
        render(&self.footer, data)
    }

    pub fn render_page_metadata(&self, data: PageMetadataData) -> Result<String> {
        render(&self.page_metadata, data)
    }

    pub fn render_head(&self, data: HeadData) -> Result<String> {
        render(&self.head, data)
    }
}

// Loads the template file contents and parses them into a template.
fn parse_template(path: &Path) -> Result<Template> {
    use std::io::Read;
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|err| Error::OpenTemplateFile {
            path: path.to_owned(),
            err,
        })?;

    let mut template = Template::default();
    template
        .parse(contents)
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

fn render<T: Into<Value>>(template: &Template, data: T) -> Result<String> {
    let context = Context::from(data).map_err(Error::Execute)?;
    let mut out: Vec<u8> = Vec::new();
    template
        .execute(&mut out, &context)
        .map_err(Error::Execute)?;
    String::from_utf8(out).map_err(|e| Error::Execute(e.to_string()))
}

/// The result of a fallible theme operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading or applying a template.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// Returned for errors applying a template.
    Execute(String),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Execute(err) => write!(f, "Executing template: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Execute(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_render() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let header = dir.path().join(HEADER_TEMPLATE);
        std::fs::write(
            &header,
            r#"<a href="{{.domain_url}}">home</a>{{range .menu}}<a href="{{.url}}">{{.title}}</a>{{end}}"#,
        )?;

        let template = parse_template(&header)?;
        let html = render(
            &template,
            HeaderData {
                domain_url: "https://example.org/".to_owned(),
                menu: array(vec![MenuLink {
                    title: "Blog".to_owned(),
                    url: "https://example.org/blog".to_owned(),
                }]),
            },
        )?;
        assert_eq!(
            r#"<a href="https://example.org/">home</a><a href="https://example.org/blog">Blog</a>"#,
            html
        );
        Ok(())
    }

    #[test]
    fn test_missing_template() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        match Theme::from_directory(dir.path()) {
            Err(Error::OpenTemplateFile { path, .. }) => {
                assert_eq!(dir.path().join(PAGE_TEMPLATE), path)
            }
            Err(e) => panic!("wanted a missing template error, got {}", e),
            Ok(_) => panic!("wanted a missing template error, got a theme"),
        }
        Ok(())
    }
}
