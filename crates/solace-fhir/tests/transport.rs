//! FhirClient against a scripted local HTTP server.

use std::sync::{Arc, Mutex};

use aws_credential_types::Credentials;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use solace_core::error::CoreError;
use solace_core::models::client::{ClientDraft, ClientStatus};
use solace_core::models::name::ClientName;
use solace_fhir::client::FhirClient;
use solace_fhir::error::FhirError;
use solace_fhir::mapper::STATUS_URL;
use solace_fhir::signer::{HEALTHLAKE_SERVICE, RequestSigner};

#[derive(Debug, Clone)]
struct Seen {
    method: String,
    path: String,
    head: String,
    body: String,
}

type Log = Arc<Mutex<Vec<Seen>>>;

/// Serve one scripted `(status, body)` reply per connection, in order.
async fn stub(replies: Vec<(u16, String)>) -> (FhirClient, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::default();

    let seen = log.clone();
    tokio::spawn(async move {
        for (status, body) in replies {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            seen.lock().unwrap().push(request);

            let reply = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/fhir+json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    let signer = RequestSigner::new(
        Some(Credentials::new("AKIDEXAMPLE", "secret", None, None, "test")),
        "us-east-1",
        HEALTHLAKE_SERVICE,
    );
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    let client = FhirClient::new(http, signer, Some(format!("http://{addr}/r4")));
    (client, log)
}

async fn read_request(socket: &mut TcpStream) -> Seen {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers were complete");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body was complete");
        buf.extend_from_slice(&chunk[..n]);
    }

    let request_line = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut parts = request_line.split_whitespace();
    Seen {
        method: parts.next().unwrap_or_default().to_string(),
        path: parts.next().unwrap_or_default().to_string(),
        head,
        body: String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string(),
    }
}

fn patient(status: &str) -> String {
    json!({
        "resourceType": "Patient",
        "id": "p-1",
        "name": [{"text": "Jane Doe", "given": ["Jane"], "family": "Doe"}],
        "telecom": [{"system": "email", "value": "jane@x.com"}],
        "extension": [
            {"url": "http://example.org/pronouns", "valueString": "she/her"},
            {"url": STATUS_URL, "valueString": status}
        ],
        "meta": {"versionId": "3"}
    })
    .to_string()
}

#[tokio::test]
async fn search_with_no_matches_is_an_empty_list() {
    let bundle = json!({"resourceType": "Bundle", "type": "searchset", "total": 0}).to_string();
    let (client, log) = stub(vec![(200, bundle)]).await;

    let clients = client.search_clients(Some("Jane Doe")).await.unwrap();
    assert!(clients.is_empty());

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].path, "/r4/Patient?name=Jane%20Doe");
    assert!(seen[0].head.contains("authorization: aws4-hmac-sha256 credential=akidexample/"));
    assert!(seen[0].head.contains("x-amz-date:"));
}

#[tokio::test]
async fn rejected_credentials_are_unauthorized() {
    for code in [401u16, 403] {
        let (client, _) = stub(vec![(code, r#"{"message":"denied"}"#.to_string())]).await;
        let err = client.get_client("p-1").await.unwrap_err();
        assert!(
            matches!(err, FhirError::Unauthorized { status } if status == code),
            "{code}: {err:?}"
        );
    }
}

#[tokio::test]
async fn missing_and_gone_resources_are_not_found() {
    for code in [404u16, 410] {
        let (client, _) = stub(vec![(code, "{}".to_string())]).await;
        let err = client.get_client("p-1").await.unwrap_err();
        assert!(matches!(err, FhirError::NotFound(_)), "{code}: {err:?}");
    }
}

#[tokio::test]
async fn other_failures_keep_status_and_body() {
    let (client, _) = stub(vec![(500, "boom".to_string())]).await;
    let err = client.search_documents(None).await.unwrap_err();
    match err {
        FhirError::UnexpectedStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn deactivate_reads_then_writes_one_status_entry() {
    let (client, log) = stub(vec![(200, patient("Active")), (200, patient("Inactive"))]).await;

    let record = client.deactivate_client("p-1").await.unwrap();
    assert_eq!(record.status(), Some(ClientStatus::Inactive));

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].method.as_str(), seen[0].path.as_str()), ("GET", "/r4/Patient/p-1"));
    assert_eq!((seen[1].method.as_str(), seen[1].path.as_str()), ("PUT", "/r4/Patient/p-1"));

    let sent: Value = serde_json::from_str(&seen[1].body).unwrap();
    let extensions = sent["extension"].as_array().unwrap();
    let statuses: Vec<_> = extensions
        .iter()
        .filter(|ext| ext["url"] == STATUS_URL)
        .collect();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0]["valueString"], "Inactive");
    assert_eq!(extensions.len(), 2);
    assert_eq!(sent["meta"]["versionId"], "3");
    assert_eq!(sent["id"], "p-1");
}

#[tokio::test]
async fn reactivation_is_refused_before_any_write() {
    let (client, log) = stub(vec![(200, patient("Inactive"))]).await;

    let draft = ClientDraft {
        name: ClientName::from("Jane Doe"),
        email: "jane@x.com".to_string(),
        next_session: None,
        status: Some(ClientStatus::Active),
    };
    let err = client.update_client("p-1", &draft).await.unwrap_err();
    assert!(matches!(
        err,
        FhirError::Core(CoreError::InvalidStatusTransition { .. })
    ));
    assert_eq!(log.lock().unwrap().len(), 1);
}
