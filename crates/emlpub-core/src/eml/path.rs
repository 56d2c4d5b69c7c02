//! Dotted path expressions and their resolution against a document

use crate::eml::document::{Document, Element, NodeAddress};
use crate::errors::{EmlError, Result};
use std::fmt;
use std::str::FromStr;

/// A dot-separated sequence of tag names, e.g. `eml.dataset.title`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmlPath {
    raw: String,
    segments: Vec<String>,
}

impl EmlPath {
    /// # Errors
    ///
    /// `EmlError::InvalidPath` when the path or any segment is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(EmlError::InvalidPath {
                path: raw.to_string(),
                reason: "path is empty".to_string(),
            });
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(EmlError::InvalidPath {
                path: raw.to_string(),
                reason: "empty path segment".to_string(),
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for EmlPath {
    type Err = EmlError;

    fn from_str(s: &str) -> Result<Self> {
        EmlPath::parse(s)
    }
}

impl fmt::Display for EmlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Locate the element a path denotes, as an address from the root element.
///
/// Each segment is searched for among the descendants of the node found by
/// the previous segment, depth-first in document order; the first match
/// wins. For the first segment the root element itself is also a candidate,
/// since it is the first descendant of the document.
pub fn locate(doc: &Document, path: &EmlPath) -> Option<NodeAddress> {
    let root = doc.root();
    let (first, rest) = path.segments.split_first()?;

    let mut address = if root.matches(first) {
        Vec::new()
    } else {
        root.find_descendant(first)?
    };

    for segment in rest {
        let current = root.descend(&address)?;
        address.extend(current.find_descendant(segment)?);
    }
    Some(address)
}

/// Resolve a path to the element it denotes
pub fn resolve<'a>(doc: &'a Document, path: &EmlPath) -> Option<&'a Element> {
    let address = locate(doc, path)?;
    doc.root().descend(&address)
}

pub fn resolve_mut<'a>(doc: &'a mut Document, path: &EmlPath) -> Option<&'a mut Element> {
    let address = locate(doc, path)?;
    doc.root_mut().descend_mut(&address)
}

/// Resolve a path relative to `start`; `start` itself never matches.
pub fn resolve_from<'a>(start: &'a Element, path: &EmlPath) -> Option<&'a Element> {
    let mut current = start;
    for segment in &path.segments {
        let address = current.find_descendant(segment)?;
        current = current.descend(&address)?;
    }
    Some(current)
}
