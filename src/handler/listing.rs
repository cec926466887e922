//! Directory listing module
//!
//! Renders the default index page for directories without an index file.

use crate::http::response::html_escape;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

impl ListingEntry {
    /// Text shown for the entry: directories end in `/`, symlinks in `@`
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else if self.is_symlink {
            format!("{}@", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Relative link target: directories end in `/` so the browser lands
    /// inside them without a redirect
    pub fn link_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Read `dir` and render its listing for the decoded request path `url_path`
pub async fn list_directory(dir: &Path, url_path: &str) -> io::Result<String> {
    let entries = read_entries(dir).await?;
    Ok(render_listing(url_path, &entries))
}

/// Collect directory entries sorted case-insensitively by name
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follows symlinks, so a link to a directory is listed as one
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    entries.sort_by_cached_key(|e| e.name.to_lowercase());
    Ok(entries)
}

/// Render the HTML listing page
pub fn render_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", html_escape(url_path));

    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{title}</h1>\n"));
    html.push_str("<hr>\n<ul>\n");
    for entry in entries {
        let href = utf8_percent_encode(&entry.link_name(), LINK_SAFE).to_string();
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            href,
            html_escape(&entry.display_name())
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}
