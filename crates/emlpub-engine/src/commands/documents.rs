//! Metadata documents stored in a package container
//!
//! Documents live under `xml/` and are named after their package
//! identifier: `xml/<packageId>.xml`.

use emlpub_core::errors::{ExError, ExErrorKind};
use emlpub_core::eml::{package_id, Document};
use emlpub_store::blob::newest_first;
use emlpub_store::errors::Result;
use emlpub_store::{BlobContainer, BlobEntry};

pub const XML_PREFIX: &str = "xml/";
pub const DATA_PREFIX: &str = "data/";

/// Blob name a document with the given package identifier is stored under
pub fn document_blob_name(package_id: &str) -> String {
    format!("{}{}.xml", XML_PREFIX, package_id)
}

/// Metadata documents in the container, newest first
pub fn list_documents(container: &dyn BlobContainer) -> Result<Vec<BlobEntry>> {
    let mut entries: Vec<BlobEntry> = container
        .list(XML_PREFIX)?
        .into_iter()
        .filter(|e| e.name.ends_with(".xml"))
        .collect();
    newest_first(&mut entries);
    Ok(entries)
}

/// The most recently modified metadata document
///
/// # Errors
///
/// `NotFound` when the container holds no `.xml` document.
pub fn latest_document(container: &dyn BlobContainer) -> Result<BlobEntry> {
    list_documents(container)?.into_iter().next().ok_or_else(|| {
        ExError::new(ExErrorKind::NotFound)
            .with_op("latest_document")
            .with_package_id(container.name())
            .with_message("no metadata document under xml/")
    })
}

/// Download and parse a stored document
pub fn load_document(container: &dyn BlobContainer, blob: &str) -> Result<Document> {
    let bytes = container.download(blob)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        ExError::new(ExErrorKind::XmlParse)
            .with_op("load_document")
            .with_blob(blob)
            .with_message(e.to_string())
    })?;
    Document::parse(&text).map_err(|e| ExError::from(e).with_blob(blob))
}

/// Serialize a document to `xml/<packageId>.xml`, replacing any previous
/// blob of that name. Returns the blob name and its URL.
pub fn write_document(container: &dyn BlobContainer, doc: &Document) -> Result<(String, String)> {
    let id = package_id(doc).map_err(ExError::from)?;
    let blob = document_blob_name(id);
    let xml = doc
        .to_xml_string()
        .map_err(|e| ExError::from(e).with_package_id(id))?;
    let url = container.upload(&blob, xml.as_bytes(), true)?;
    Ok((blob, url))
}
