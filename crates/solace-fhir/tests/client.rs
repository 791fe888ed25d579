use aws_credential_types::Credentials;
use solace_core::models::name::ClientName;
use solace_core::models::client::ClientDraft;
use solace_fhir::client::FhirClient;
use solace_fhir::error::FhirError;
use solace_fhir::signer::{HEALTHLAKE_SERVICE, RequestSigner};

fn client(endpoint: Option<&str>) -> FhirClient {
    let signer = RequestSigner::new(
        Some(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test")),
        "us-east-1",
        HEALTHLAKE_SERVICE,
    );
    FhirClient::new(reqwest::Client::new(), signer, endpoint.map(str::to_string))
}

#[test]
fn search_terms_are_percent_encoded() {
    let client = client(Some("https://healthlake.us-east-1.amazonaws.com/datastore/abc/r4/"));
    let url = client.search_url("Patient", "name", Some(" Jane Doe+1 ")).unwrap();
    assert_eq!(
        url,
        "https://healthlake.us-east-1.amazonaws.com/datastore/abc/r4/Patient?name=Jane%20Doe%2B1"
    );
}

#[test]
fn blank_search_term_searches_everything() {
    let client = client(Some("https://example.com/r4"));
    assert_eq!(
        client.search_url("DocumentReference", "title", Some("  ")).unwrap(),
        "https://example.com/r4/DocumentReference"
    );
    assert_eq!(
        client.resource_url("Patient", Some("p-1")).unwrap(),
        "https://example.com/r4/Patient/p-1"
    );
}

#[tokio::test]
async fn missing_endpoint_fails_the_call() {
    let client = client(None);
    let err = client.search_clients(None).await.unwrap_err();
    assert!(matches!(err, FhirError::MissingConfig("AWS_HEALTHLAKE_ENDPOINT")));

    let draft = ClientDraft {
        name: ClientName::from("Jane"),
        email: "jane@x.com".to_string(),
        next_session: None,
        status: None,
    };
    let err = client.create_client(&draft).await.unwrap_err();
    assert!(matches!(err, FhirError::MissingConfig(_)));
}
