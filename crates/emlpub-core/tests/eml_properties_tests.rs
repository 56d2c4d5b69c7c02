//! Behavioural properties of the EML mutation kernel

use emlpub_core::eml::{
    apply_replacements, increment_revision, known_paths, package_id, resolve, set_package_id,
    Document, EmlPath, ReplacementSet,
};
use emlpub_core::errors::EmlError;
use proptest::prelude::*;

const EML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<eml:eml xmlns:eml="https://eml.ecoinformatics.org/eml-2.2.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" packageId="edi.1047.5" system="https://pasta.edirepository.org">
  <dataset>
    <title>Juvenile salmon run identification</title>
    <dataTable>
      <entityName>genetics-data</entityName>
      <entityDescription>Run assignments</entityDescription>
      <physical>
        <objectName>genetics-data.csv</objectName>
        <size unit="byte">100</size>
        <distribution>
          <online>
            <url function="download">https://example.org/old.csv</url>
          </online>
        </distribution>
      </physical>
    </dataTable>
  </dataset>
</eml:eml>
"#;

fn doc() -> Document {
    Document::parse(EML).unwrap()
}

fn text(doc: &Document, raw: &str) -> Option<String> {
    resolve(doc, &EmlPath::parse(raw).unwrap()).map(|el| el.text())
}

#[test]
fn test_known_paths_resolve_in_sample() {
    let doc = doc();
    assert_eq!(text(&doc, known_paths::DATASET_NAME).as_deref(), Some("genetics-data"));
    assert_eq!(text(&doc, known_paths::CSV_SIZE).as_deref(), Some("100"));
    assert_eq!(
        text(&doc, known_paths::CSV_URL).as_deref(),
        Some("https://example.org/old.csv")
    );
}

#[test]
fn test_lowercase_datatable_does_not_resolve() {
    // tag matching is case-sensitive
    assert!(text(&doc(), "eml.dataset.datatable.physical.size").is_none());
}

#[test]
fn test_mixed_valid_and_invalid_paths() {
    let mut doc = doc();
    let set = ReplacementSet::from_pairs([
        (known_paths::CSV_URL, "https://blobs/1047/data/genetics-data.csv"),
        (known_paths::CSV_SIZE, "2048"),
        ("eml.dataset.otherEntity.physical.size", "1"),
    ])
    .unwrap();

    let report = apply_replacements(&mut doc, &set);

    assert_eq!(report.applied.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        text(&doc, known_paths::CSV_URL).as_deref(),
        Some("https://blobs/1047/data/genetics-data.csv")
    );
    assert_eq!(text(&doc, known_paths::CSV_SIZE).as_deref(), Some("2048"));
}

#[test]
fn test_round_trip_package_id() {
    let mut doc = doc();
    let next = increment_revision(package_id(&doc).unwrap()).unwrap();
    assert_eq!(next, "edi.1047.6");

    set_package_id(&mut doc, &next).unwrap();
    let xml = doc.to_xml_string().unwrap();
    let reparsed = Document::parse(&xml).unwrap();

    assert_eq!(package_id(&reparsed).unwrap(), "edi.1047.6");
    assert_eq!(
        reparsed.root().attribute("system"),
        Some("https://pasta.edirepository.org")
    );
}

#[test]
fn test_round_trip_preserves_untouched_content() {
    let mut doc = doc();
    let set = ReplacementSet::from_pairs([(known_paths::CSV_SIZE, "7")]).unwrap();
    apply_replacements(&mut doc, &set);

    let reparsed = Document::parse(&doc.to_xml_string().unwrap()).unwrap();
    assert_eq!(reparsed, doc);
    assert_eq!(
        text(&reparsed, "eml.dataset.title").as_deref(),
        Some("Juvenile salmon run identification")
    );
}

#[test]
fn test_increment_format_error() {
    assert!(matches!(
        increment_revision("edi.x"),
        Err(EmlError::Format { .. })
    ));
}

proptest! {
    #[test]
    fn prop_apply_is_idempotent(title in "[ -~]{0,40}", size in 0u64..1_000_000) {
        let set = ReplacementSet::from_pairs([
            ("eml.dataset.title".to_string(), title.clone()),
            (known_paths::CSV_SIZE.to_string(), size.to_string()),
        ])
        .unwrap();

        let mut once = doc();
        apply_replacements(&mut once, &set);
        let mut twice = once.clone();
        apply_replacements(&mut twice, &set);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(text(&once, "eml.dataset.title"), Some(title));
    }

    #[test]
    fn prop_package_id_survives_serialization(id in "[a-z]{1,6}\\.[0-9]{1,5}\\.[0-9]{1,4}") {
        let mut doc = doc();
        set_package_id(&mut doc, &id).unwrap();
        let reparsed = Document::parse(&doc.to_xml_string().unwrap()).unwrap();
        prop_assert_eq!(package_id(&reparsed).unwrap(), id.as_str());
    }
}
