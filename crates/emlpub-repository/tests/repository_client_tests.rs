// Repository client against a mock package API.

use emlpub_repository::{
    Credentials, EvaluationTicket, PackageRef, RepositoryClient, RepositoryError,
};
use wiremock::matchers::{basic_auth, body_bytes, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EML: &str = r#"<eml:eml packageId="edi.1047.6"><dataset/></eml:eml>"#;
const PRINCIPAL: &str = "uid=jdoe,o=EDI,dc=edirepository,dc=org";

async fn setup() -> (MockServer, RepositoryClient, String) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1047/xml/edi.1047.6.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EML))
        .mount(&server)
        .await;

    let client = RepositoryClient::with_base_url(
        &server.uri(),
        Credentials::new("jdoe", "s3cret"),
        PackageRef::edi("1047"),
    )
    .unwrap();
    let xml_url = format!("{}/1047/xml/edi.1047.6.xml", server.uri());

    (server, client, xml_url)
}

#[tokio::test]
async fn test_evaluate_posts_document_with_auth() {
    let (server, client, xml_url) = setup().await;

    Mock::given(method("POST"))
        .and(path("/package/evaluate/eml"))
        .and(basic_auth(PRINCIPAL, "s3cret"))
        .and(header("content-type", "application/xml"))
        .and(body_bytes(EML.as_bytes()))
        .respond_with(ResponseTemplate::new(202).set_body_string("evaluate_163966785813042760\n"))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = client.evaluate_package(&xml_url).await.unwrap();
    assert_eq!(ticket.transaction_id(), "evaluate_163966785813042760");
}

#[tokio::test]
async fn test_evaluation_report_uses_transaction_id() {
    let (server, client, _xml_url) = setup().await;

    Mock::given(method("GET"))
        .and(path("/package/evaluate/report/eml/evaluate_42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<qualityReport/>"))
        .mount(&server)
        .await;

    let report = client
        .evaluation_report(&EvaluationTicket::new("evaluate_42"))
        .await
        .unwrap();
    assert_eq!(report, "<qualityReport/>");
}

#[tokio::test]
async fn test_upload_posts_to_package_eml() {
    let (server, client, xml_url) = setup().await;

    Mock::given(method("POST"))
        .and(path("/package/eml"))
        .and(basic_auth(PRINCIPAL, "s3cret"))
        .and(body_bytes(EML.as_bytes()))
        .respond_with(ResponseTemplate::new(202).set_body_string("create_1"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.upload_package(&xml_url).await.unwrap(), "create_1");
}

#[tokio::test]
async fn test_update_puts_to_scoped_package() {
    let (server, client, xml_url) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/package/eml/edi/1047"))
        .and(basic_auth(PRINCIPAL, "s3cret"))
        .respond_with(ResponseTemplate::new(202).set_body_string("update_7"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.update_package(&xml_url).await.unwrap(), "update_7");
}

#[tokio::test]
async fn test_list_revisions_filters_newest() {
    let (server, client, _xml_url) = setup().await;

    Mock::given(method("GET"))
        .and(path("/package/eml/edi/1047"))
        .and(query_param("filter", "newest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("6"))
        .mount(&server)
        .await;

    assert_eq!(client.list_revisions().await.unwrap(), "6");
}

#[tokio::test]
async fn test_non_success_status_is_server_error() {
    let (server, client, xml_url) = setup().await;

    Mock::given(method("POST"))
        .and(path("/package/evaluate/eml"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client.evaluate_package(&xml_url).await.unwrap_err();
    match err {
        RepositoryError::Server { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("expected Server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_document_fails_before_submission() {
    let (server, client, _xml_url) = setup().await;

    Mock::given(method("POST"))
        .and(path("/package/eml"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let missing = format!("{}/1047/xml/edi.1047.99.xml", server.uri());
    let err = client.upload_package(&missing).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Fetch { status: 404, .. }));
}

#[tokio::test]
async fn test_blank_transaction_id_is_rejected() {
    let (server, client, xml_url) = setup().await;

    Mock::given(method("POST"))
        .and(path("/package/evaluate/eml"))
        .respond_with(ResponseTemplate::new(202).set_body_string("  \n"))
        .mount(&server)
        .await;

    let err = client.evaluate_package(&xml_url).await.unwrap_err();
    assert!(matches!(err, RepositoryError::EmptyTransaction));
}
