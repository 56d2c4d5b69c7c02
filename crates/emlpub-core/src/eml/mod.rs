//! EML (Ecological Metadata Language) document handling
//!
//! - `document`: owned, mutable XML tree with lossless parse/serialize
//! - `path`: dotted path expressions and subtree resolution
//! - `mutate`: bulk text replacement and package identifier edits
//! - `revision`: package identifier revision arithmetic
//! - `known_paths`: dotted paths the publishing pipeline rewrites

pub mod document;
pub mod known_paths;
pub mod mutate;
pub mod path;
pub mod revision;

pub use document::{Document, Element, Misc, Node, NodeAddress};
pub use mutate::{
    apply_replacements, eml_root, package_id, set_package_id, ReplacementReport, ReplacementSet,
    EML_ROOT_TAG, PACKAGE_ID_ATTR,
};
pub use path::{locate, resolve, resolve_from, resolve_mut, EmlPath};
pub use revision::{increment_revision, revision_of};
