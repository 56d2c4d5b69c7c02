use emlpub_core::errors::{EmlError, ExError, ExErrorKind};

#[test]
fn test_path_not_found_maps_to_kind_with_path() {
    let ex: ExError = EmlError::PathNotFound {
        path: "eml.dataset.title".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::PathNotFound);
    assert_eq!(ex.code(), "ERR_PATH_NOT_FOUND");
    assert_eq!(ex.eml_path(), Some("eml.dataset.title"));
}

#[test]
fn test_root_not_found_distinct_from_path_not_found() {
    let ex: ExError = EmlError::RootNotFound {
        tag: "eml:eml".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::RootNotFound);
    assert_ne!(ex.kind(), ExErrorKind::PathNotFound);
    assert!(ex.message().contains("eml:eml"));
}

#[test]
fn test_format_error_carries_identifier() {
    let ex: ExError = EmlError::Format {
        value: "edi.x".to_string(),
        reason: "not a number".to_string(),
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::InvalidRevision);
    assert_eq!(ex.package_id(), Some("edi.x"));
}

#[test]
fn test_parse_and_serialize_kinds() {
    let parse: ExError = EmlError::Parse {
        message: "bad".to_string(),
    }
    .into();
    let write: ExError = EmlError::Serialize {
        message: "bad".to_string(),
    }
    .into();

    assert_eq!(parse.kind(), ExErrorKind::XmlParse);
    assert_eq!(write.kind(), ExErrorKind::Serialization);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::ExternalService, "ERR_EXTERNAL_SERVICE"),
        (ExErrorKind::Config, "ERR_CONFIG"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
