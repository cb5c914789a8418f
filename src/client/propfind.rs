//! PROPFIND request body and multistatus parsing.

use crate::error::{DavError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;
use std::fmt;

/// Properties requested for every listed resource.
pub const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:displayname/>
    <d:resourcetype/>
    <d:getcontentlength/>
    <d:getcontenttype/>
    <d:getetag/>
    <d:getlastmodified/>
  </d:prop>
</d:propfind>"#;

/// A file or collection on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Decoded server path.
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    /// `getlastmodified` as sent by the server (an HTTP date).
    pub modified: Option<String>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

impl FileInfo {
    fn from_parts(href: &str, props: Props) -> Self {
        let path = decode_href(href);
        let name = props
            .displayname
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                path.trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Self {
            path,
            name,
            is_dir: props.is_dir,
            size: props.size.unwrap_or(0),
            modified: props.modified,
            content_type: props.content_type,
            etag: props.etag,
        }
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "Dir : '{}' - '{}'", self.path, self.name)
        } else {
            write!(
                f,
                "File: '{}' SIZE: {} MODIFIED: {} ETAG: {} CTYPE: {}",
                self.path,
                self.size,
                self.modified.as_deref().unwrap_or("-"),
                self.etag.as_deref().unwrap_or("-"),
                self.content_type.as_deref().unwrap_or("-"),
            )
        }
    }
}

#[derive(Debug, Default)]
struct Props {
    displayname: Option<String>,
    is_dir: bool,
    size: Option<u64>,
    modified: Option<String>,
    content_type: Option<String>,
    etag: Option<String>,
}

impl Props {
    fn merge(&mut self, other: Props) {
        self.displayname = other.displayname.or(self.displayname.take());
        self.is_dir |= other.is_dir;
        self.size = other.size.or(self.size);
        self.modified = other.modified.or(self.modified.take());
        self.content_type = other.content_type.or(self.content_type.take());
        self.etag = other.etag.or(self.etag.take());
    }
}

#[derive(Debug, Default)]
struct Propstat {
    props: Props,
    status: Option<String>,
}

impl Propstat {
    /// Propstats without a status line are taken as successful.
    fn is_ok(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|status| status.split_whitespace().nth(1) == Some("200"))
    }
}

#[derive(Debug, Default)]
struct ResponseEntry {
    href: Option<String>,
    props: Props,
}

fn decode_href(href: &str) -> String {
    let path = if href.starts_with("http://") || href.starts_with("https://") {
        reqwest::Url::parse(href)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| href.to_string())
    } else {
        href.to_string()
    };

    urlencoding::decode(&path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(path)
}

fn xml_error(err: impl fmt::Display) -> DavError {
    DavError::Xml(err.to_string())
}

/// Parse a `207 Multi-Status` body.
///
/// Elements are matched on their local name so any namespace prefix works.
/// Only properties from propstats with a `200` status are used.
pub fn parse_multistatus(xml: &str) -> Result<Vec<FileInfo>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut files = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut response: Option<ResponseEntry> = None;
    let mut propstat: Option<Propstat> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "response" => response = Some(ResponseEntry::default()),
                    "propstat" => propstat = Some(Propstat::default()),
                    "collection" => mark_collection(&stack, propstat.as_mut()),
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"collection" {
                    mark_collection(&stack, propstat.as_mut());
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(xml_error)?;
                assign(&stack, &text, response.as_mut(), propstat.as_mut());
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let text = String::from_utf8_lossy(&raw);
                assign(&stack, &text, response.as_mut(), propstat.as_mut());
            }
            Event::End(_) => match stack.pop().as_deref() {
                Some("propstat") => {
                    if let (Some(done), Some(entry)) = (propstat.take(), response.as_mut())
                        && done.is_ok()
                    {
                        entry.props.merge(done.props);
                    }
                }
                Some("response") => {
                    if let Some(entry) = response.take() {
                        match entry.href {
                            Some(href) => files.push(FileInfo::from_parts(&href, entry.props)),
                            None => return Err(DavError::Xml("response without href".into())),
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(files)
}

fn mark_collection(stack: &[String], propstat: Option<&mut Propstat>) {
    if stack.last().map(String::as_str) == Some("resourcetype")
        && let Some(propstat) = propstat
    {
        propstat.props.is_dir = true;
    }
}

fn assign(
    stack: &[String],
    text: &str,
    response: Option<&mut ResponseEntry>,
    propstat: Option<&mut Propstat>,
) {
    let Some(element) = stack.last().map(String::as_str) else {
        return;
    };

    if let Some(propstat) = propstat {
        let props = &mut propstat.props;
        match element {
            "status" => propstat.status = Some(text.to_string()),
            "displayname" => props.displayname = Some(text.to_string()),
            "getcontentlength" => props.size = text.trim().parse().ok(),
            "getlastmodified" => props.modified = Some(text.to_string()),
            "getcontenttype" => props.content_type = Some(text.to_string()),
            "getetag" => props.etag = Some(text.to_string()),
            _ => {}
        }
    } else if element == "href"
        && let Some(response) = response
    {
        response.href = Some(text.to_string());
    }
}
