use emlpub_core_types::RequestId;
use thiserror::Error;

/// Result type alias using EmlError
pub type Result<T> = std::result::Result<T, EmlError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error that leaves a crate boundary is classified into one of these
/// kinds. Each kind maps to a stable code used in logs and HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidPath,

    // Metadata document
    NotFound,
    PathNotFound,
    RootNotFound,
    MissingAttribute,
    InvalidRevision,
    XmlParse,

    // Storage
    AlreadyExists,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::PathNotFound => "ERR_PATH_NOT_FOUND",
            ExErrorKind::RootNotFound => "ERR_ROOT_NOT_FOUND",
            ExErrorKind::MissingAttribute => "ERR_MISSING_ATTRIBUTE",
            ExErrorKind::InvalidRevision => "ERR_INVALID_REVISION",
            ExErrorKind::XmlParse => "ERR_XML_PARSE",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever publishing context was known
/// where the error was raised.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    package_id: Option<String>,
    blob: Option<String>,
    eml_path: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error of the given kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            package_id: None,
            blob: None,
            eml_path: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add package identifier (or package number) context
    pub fn with_package_id(mut self, id: impl Into<String>) -> Self {
        self.package_id = Some(id.into());
        self
    }

    /// Add blob name context
    pub fn with_blob(mut self, name: impl Into<String>) -> Self {
        self.blob = Some(name.into());
        self
    }

    /// Add dotted EML path context
    pub fn with_eml_path(mut self, path: impl Into<String>) -> Self {
        self.eml_path = Some(path.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref()
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    pub fn eml_path(&self) -> Option<&str> {
        self.eml_path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(package_id) = &self.package_id {
            write!(f, " (package: {})", package_id)?;
        }
        if let Some(blob) = &self.blob {
            write!(f, " (blob: {})", blob)?;
        }
        if let Some(path) = &self.eml_path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Errors raised while reading or mutating an EML document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmlError {
    /// A dotted path did not resolve to an element
    #[error("EML path not found: {path}")]
    PathNotFound { path: String },

    /// The distinguished document root element is absent
    #[error("Unable to locate top level <{tag}> element")]
    RootNotFound { tag: String },

    /// A package identifier's revision component is not a base-10 integer
    #[error("Invalid package identifier '{value}': {reason}")]
    Format { value: String, reason: String },

    /// A required attribute is absent from an element
    #[error("Element <{tag}> has no '{attribute}' attribute")]
    MissingAttribute { tag: String, attribute: String },

    /// A dotted path expression is malformed
    #[error("Invalid EML path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The document could not be parsed as XML
    #[error("XML parse error: {message}")]
    Parse { message: String },

    /// The document could not be written back out
    #[error("XML serialization error: {message}")]
    Serialize { message: String },
}

impl From<quick_xml::Error> for EmlError {
    fn from(err: quick_xml::Error) -> Self {
        EmlError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for EmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        EmlError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<EmlError> for ExError {
    fn from(err: EmlError) -> Self {
        match err {
            EmlError::PathNotFound { ref path } => ExError::new(ExErrorKind::PathNotFound)
                .with_eml_path(path.clone())
                .with_message(err.to_string()),
            EmlError::RootNotFound { .. } => {
                ExError::new(ExErrorKind::RootNotFound).with_message(err.to_string())
            }
            EmlError::Format { ref value, .. } => ExError::new(ExErrorKind::InvalidRevision)
                .with_package_id(value.clone())
                .with_message(err.to_string()),
            EmlError::MissingAttribute { .. } => {
                ExError::new(ExErrorKind::MissingAttribute).with_message(err.to_string())
            }
            EmlError::InvalidPath { ref path, .. } => ExError::new(ExErrorKind::InvalidPath)
                .with_eml_path(path.clone())
                .with_message(err.to_string()),
            EmlError::Parse { message } => {
                ExError::new(ExErrorKind::XmlParse).with_message(message)
            }
            EmlError::Serialize { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds_have_distinct_codes() {
        assert_eq!(ExErrorKind::PathNotFound.code(), "ERR_PATH_NOT_FOUND");
        assert_eq!(ExErrorKind::RootNotFound.code(), "ERR_ROOT_NOT_FOUND");
        assert_eq!(ExErrorKind::InvalidRevision.code(), "ERR_INVALID_REVISION");
        assert_ne!(
            ExErrorKind::PathNotFound.code(),
            ExErrorKind::RootNotFound.code()
        );
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("download_blob")
            .with_blob("xml/edi.1.2.xml")
            .with_message("blob not found");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_NOT_FOUND] in operation 'download_blob'"));
        assert!(rendered.contains("(blob: xml/edi.1.2.xml)"));
    }

    #[test]
    fn test_request_id_is_carried() {
        let id = RequestId::from_string("req-1".to_string());
        let err = ExError::new(ExErrorKind::Internal).with_request_id(id.clone());
        assert_eq!(err.request_id(), Some(&id));
    }
}
