//! Dotted paths into an EML 2.x dataset that publishing rewrites

use crate::eml::path::EmlPath;
use crate::errors::Result;

pub const DATASET_NAME: &str = "eml.dataset.dataTable.entityName";
pub const DATASET_DESCRIPTION: &str = "eml.dataset.dataTable.entityDescription";
pub const CSV_URL: &str = "eml.dataset.dataTable.physical.distribution.online.url";
pub const CSV_SIZE: &str = "eml.dataset.dataTable.physical.size";

/// Every known path, keyed by the short name used in config and the CLI
pub const ALL: [(&str, &str); 4] = [
    ("dataset_name", DATASET_NAME),
    ("dataset_description", DATASET_DESCRIPTION),
    ("csv_url", CSV_URL),
    ("csv_size", CSV_SIZE),
];

/// Look up a known path by short name (`csv_url`, `csv_size`, ...)
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL.iter().find(|(key, _)| *key == name).map(|(_, p)| *p)
}

/// Parse a path argument that may be either a short name or a dotted path
///
/// # Errors
///
/// `EmlError::InvalidPath` when the argument is neither.
pub fn expand(arg: &str) -> Result<EmlPath> {
    EmlPath::parse(by_name(arg).unwrap_or(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths_parse() {
        for (_, raw) in ALL {
            assert!(EmlPath::parse(raw).is_ok(), "{} should parse", raw);
        }
    }

    #[test]
    fn test_expand_short_name_and_literal() {
        assert_eq!(expand("csv_url").unwrap().as_str(), CSV_URL);
        assert_eq!(expand("eml.dataset.title").unwrap().as_str(), "eml.dataset.title");
        assert!(expand("").is_err());
    }
}
