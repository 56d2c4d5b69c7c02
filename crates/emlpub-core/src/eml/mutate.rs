//! In-place edits of an EML document
//!
//! Bulk text replacement is best-effort: a path that does not resolve is
//! recorded as skipped and the remaining replacements still apply. Setting
//! the package identifier is not: without the `eml:eml` root nothing
//! downstream can name the document, so it fails.

use crate::eml::document::{Document, Element, NodeAddress};
use crate::eml::path::{locate, EmlPath};
use crate::errors::{EmlError, ExErrorKind, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Qualified name of the distinguished document root
pub const EML_ROOT_TAG: &str = "eml:eml";

/// Attribute on the root carrying the package identifier
pub const PACKAGE_ID_ATTR: &str = "packageId";

/// Path → replacement text. Keys are unique; application order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementSet {
    entries: BTreeMap<EmlPath, String>,
}

impl ReplacementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a replacement, returning the previous value for that path
    pub fn insert(&mut self, path: EmlPath, value: impl Into<String>) -> Option<String> {
        self.entries.insert(path, value.into())
    }

    /// Build from string pairs, validating every path
    ///
    /// # Errors
    ///
    /// `EmlError::InvalidPath` for the first malformed path.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (path, value) in pairs {
            set.insert(EmlPath::parse(path.as_ref())?, value);
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EmlPath, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which replacements took effect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplacementReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

impl ReplacementReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// One `EmlError::PathNotFound` per skipped path
    pub fn skip_errors(&self) -> Vec<EmlError> {
        self.skipped.iter().map(|path| path_not_found(path)).collect()
    }
}

fn path_not_found(path: &str) -> EmlError {
    EmlError::PathNotFound {
        path: path.to_string(),
    }
}

/// Replace the text of every element a path in `replacements` resolves to.
///
/// Each path is resolved independently from the root. The target's children
/// are discarded and the replacement string becomes its only content.
pub fn apply_replacements(doc: &mut Document, replacements: &ReplacementSet) -> ReplacementReport {
    let mut report = ReplacementReport::default();

    for (path, value) in replacements.iter() {
        let target = locate(doc, path).and_then(|addr| doc.root_mut().descend_mut(&addr));
        match target {
            Some(el) => {
                el.set_text(value);
                report.applied.push(path.to_string());
            }
            None => {
                let err = path_not_found(path.as_str());
                tracing::warn!(
                    op = "apply_replacements",
                    eml_path = %path,
                    err_code = ExErrorKind::PathNotFound.code(),
                    "replacement skipped: {}",
                    err
                );
                report.skipped.push(path.to_string());
            }
        }
    }

    report
}

fn locate_eml_root(doc: &Document) -> Option<NodeAddress> {
    let root = doc.root();
    if root.name() == EML_ROOT_TAG {
        Some(Vec::new())
    } else {
        root.find_qualified(EML_ROOT_TAG)
    }
}

/// The `eml:eml` element, looked up by qualified name
///
/// # Errors
///
/// `EmlError::RootNotFound` if the document has no such element.
pub fn eml_root(doc: &Document) -> Result<&Element> {
    locate_eml_root(doc)
        .and_then(|addr| doc.root().descend(&addr))
        .ok_or_else(|| EmlError::RootNotFound {
            tag: EML_ROOT_TAG.to_string(),
        })
}

/// Set the `packageId` attribute on the `eml:eml` element
///
/// # Errors
///
/// `EmlError::RootNotFound` if the element is absent; the document is left
/// unchanged.
pub fn set_package_id(doc: &mut Document, new_id: &str) -> Result<()> {
    let address = locate_eml_root(doc).ok_or_else(|| EmlError::RootNotFound {
        tag: EML_ROOT_TAG.to_string(),
    })?;
    let root = doc
        .root_mut()
        .descend_mut(&address)
        .ok_or_else(|| EmlError::RootNotFound {
            tag: EML_ROOT_TAG.to_string(),
        })?;
    root.set_attribute(PACKAGE_ID_ATTR, new_id);
    Ok(())
}

/// Read the `packageId` attribute of the `eml:eml` element
///
/// # Errors
///
/// `RootNotFound` if the element is absent, `MissingAttribute` if it has no
/// `packageId`.
pub fn package_id(doc: &Document) -> Result<&str> {
    eml_root(doc)?
        .attribute(PACKAGE_ID_ATTR)
        .ok_or_else(|| EmlError::MissingAttribute {
            tag: EML_ROOT_TAG.to_string(),
            attribute: PACKAGE_ID_ATTR.to_string(),
        })
}
