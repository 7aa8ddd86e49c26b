//! Google Drive v2 file metadata and HTML export.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::Fetch;
use crate::document::SourceDocument;
use crate::error::{Error, Result};
use crate::util::decode_text;

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v2/files";

/// Characters left alone in a file id path segment.
const FILE_ID: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// The parts of a Drive file resource the converter uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub title: String,
    #[serde(default)]
    pub export_links: HashMap<String, String>,
    #[serde(default)]
    pub last_modifying_user_name: Option<String>,
}

impl DriveFile {
    pub fn html_export_link(&self) -> Option<&str> {
        self.export_links.get("text/html").map(String::as_str)
    }
}

/// Drive requests issued through a [`Fetch`] implementation.
pub struct DriveClient<F> {
    fetcher: F,
}

impl<F: Fetch> DriveClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Metadata of file `id`.
    pub fn file(&self, id: &str) -> Result<DriveFile> {
        let url = format!("{FILES_ENDPOINT}/{}", utf8_percent_encode(id, FILE_ID));
        let fetched = self.fetcher.fetch(&url)?;
        Ok(serde_json::from_slice(&fetched.body)?)
    }

    /// Raw HTML export of `file`.
    pub fn export_html(&self, id: &str, file: &DriveFile) -> Result<Vec<u8>> {
        let link = file
            .html_export_link()
            .ok_or_else(|| Error::MissingExport { id: id.to_string() })?;
        log::debug!("exporting {id} from {link}");
        Ok(self.fetcher.fetch(link)?.body)
    }

    /// Metadata and HTML export of `id`, ready for conversion.
    pub fn fetch_document(&self, id: &str) -> Result<SourceDocument> {
        let file = self.file(id)?;
        let html = self.export_html(id, &file)?;
        Ok(SourceDocument {
            title: file.title.clone(),
            author: file.last_modifying_user_name.clone().unwrap_or_default(),
            html: decode_text(&html, None).into_owned(),
        })
    }
}
