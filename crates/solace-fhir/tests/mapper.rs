use serde_json::json;

use solace_core::models::client::{ClientDraft, ClientStatus};
use solace_core::models::document::DocumentDraft;
use solace_core::models::name::ClientName;
use solace_fhir::mapper::{
    self, NEXT_SESSION_URL, STATUS_URL, UNTITLED, client_from_patient, document_from_draft,
    document_from_reference, note_from_draft, note_from_reference, patient_from_draft,
    records_from_bundle, set_status_extension,
};
use solace_fhir::resource::{Bundle, DocumentReference, Patient};

fn jane_draft() -> ClientDraft {
    serde_json::from_value(json!({
        "name": {"given": ["Jane"], "family": "Doe"},
        "email": "jane@x.com",
        "nextSession": "2024-05-01T10:00",
        "status": "Active"
    }))
    .expect("draft should deserialize")
}

/// Serialize and parse back, as the store would echo the resource.
fn over_the_wire(patient: &Patient) -> Patient {
    let json = serde_json::to_value(patient).unwrap();
    serde_json::from_value(json).unwrap()
}

#[test]
fn example_record_maps_to_two_extensions_and_back() {
    let patient = patient_from_draft(&jane_draft());
    let wire = serde_json::to_value(&patient).unwrap();

    assert_eq!(wire["resourceType"], "Patient");
    let extensions = wire["extension"].as_array().unwrap();
    assert_eq!(extensions.len(), 2);
    assert!(extensions.iter().any(|e| e["url"] == NEXT_SESSION_URL
        && e["valueDateTime"] == "2024-05-01T10:00"));
    assert!(extensions
        .iter()
        .any(|e| e["url"] == STATUS_URL && e["valueString"] == "Active"));
    assert_eq!(wire["telecom"][0]["system"], "email");
    assert_eq!(wire["telecom"][0]["value"], "jane@x.com");

    let record = client_from_patient(over_the_wire(&patient));
    assert_eq!(record.display_name(), "Jane Doe");
}

#[test]
fn email_and_next_session_round_trip_unchanged() {
    let draft = jane_draft();
    let record = client_from_patient(over_the_wire(&patient_from_draft(&draft)));

    assert_eq!(record.email(), draft.email);
    assert_eq!(record.next_session(), draft.next_session.as_deref());
    assert_eq!(record.status(), Some(ClientStatus::Active));
}

#[test]
fn new_client_defaults_to_active() {
    let mut draft = jane_draft();
    draft.status = None;
    let patient = patient_from_draft(&draft);
    assert_eq!(mapper::status(&patient.extension), Some(ClientStatus::Active));
}

#[test]
fn missing_next_session_emits_only_status_entry() {
    let mut draft = jane_draft();
    draft.next_session = None;
    let patient = patient_from_draft(&draft);
    assert_eq!(patient.extension.len(), 1);
    assert_eq!(patient.extension[0].url, STATUS_URL);
}

#[test]
fn missing_extension_leaves_status_unset() {
    let patient: Patient = serde_json::from_value(json!({
        "resourceType": "Patient",
        "id": "p-1",
        "name": [{"given": ["Jane"], "family": "Doe"}]
    }))
    .unwrap();

    let record = client_from_patient(patient);
    assert_eq!(record.id(), "p-1");
    assert_eq!(record.status(), None);
    assert_eq!(record.next_session(), None);
    assert_eq!(record.email(), "");
}

#[test]
fn unknown_status_value_is_treated_as_unset() {
    let patient: Patient = serde_json::from_value(json!({
        "resourceType": "Patient",
        "extension": [{"url": STATUS_URL, "valueString": "Archived"}]
    }))
    .unwrap();
    assert_eq!(client_from_patient(patient).status(), None);
}

#[test]
fn every_wire_name_shape_normalizes() {
    let shapes = [
        json!("Jane Doe"),
        json!(["Jane", "Doe"]),
        json!({"given": ["Jane"], "family": "Doe"}),
        json!([{"given": "Jane", "family": "Doe"}]),
        json!([{"text": "Jane Doe"}]),
    ];

    for name in shapes {
        let patient: Patient =
            serde_json::from_value(json!({"resourceType": "Patient", "name": name})).unwrap();
        assert_eq!(client_from_patient(patient).display_name(), "Jane Doe");
    }
}

#[test]
fn structured_name_with_gaps_has_single_separators() {
    let patient: Patient = serde_json::from_value(json!({
        "resourceType": "Patient",
        "name": [{"prefix": [""], "given": ["", "Jane"], "family": ""}]
    }))
    .unwrap();
    assert_eq!(client_from_patient(patient).display_name(), "Jane");
}

#[test]
fn setting_inactive_mutates_existing_entry_in_place() {
    let mut patient = patient_from_draft(&jane_draft());
    let before = patient.extension.len();

    set_status_extension(&mut patient.extension, ClientStatus::Inactive);

    assert_eq!(patient.extension.len(), before);
    let status_entries: Vec<_> = patient
        .extension
        .iter()
        .filter(|e| e.url == STATUS_URL)
        .collect();
    assert_eq!(status_entries.len(), 1);
    assert_eq!(status_entries[0].value_string.as_deref(), Some("Inactive"));
}

#[test]
fn setting_status_appends_when_absent() {
    let mut extensions = Vec::new();
    set_status_extension(&mut extensions, ClientStatus::Inactive);
    assert_eq!(extensions.len(), 1);
    assert_eq!(mapper::status(&extensions), Some(ClientStatus::Inactive));
}

#[test]
fn update_keeps_foreign_extensions_and_members() {
    let mut patient: Patient = serde_json::from_value(json!({
        "resourceType": "Patient",
        "id": "p-7",
        "birthDate": "1990-01-01",
        "extension": [
            {"url": "http://example.org/other", "valueBoolean": true},
            {"url": STATUS_URL, "valueString": "Active"}
        ]
    }))
    .unwrap();

    let draft = ClientDraft {
        name: ClientName::from("Jane Roe"),
        email: "roe@x.com".to_string(),
        next_session: Some("2024-06-01T09:30".to_string()),
        status: None,
    };
    mapper::apply_draft(&mut patient, &draft, ClientStatus::Active);

    let wire = serde_json::to_value(&patient).unwrap();
    assert_eq!(wire["id"], "p-7");
    assert_eq!(wire["birthDate"], "1990-01-01");
    assert_eq!(wire["extension"].as_array().unwrap().len(), 3);
    assert_eq!(wire["extension"][0]["valueBoolean"], true);

    let record = client_from_patient(patient);
    assert_eq!(record.display_name(), "Jane Roe");
    assert_eq!(record.email(), "roe@x.com");
}

#[test]
fn document_is_base64_on_the_wire_and_plain_in_the_record() {
    let draft = DocumentDraft {
        title: "Intake checklist".to_string(),
        content: "Ask about sleep.".to_string(),
        content_type: "text/plain".to_string(),
    };
    let reference = document_from_draft(&draft);
    let wire = serde_json::to_value(&reference).unwrap();

    assert_eq!(wire["resourceType"], "DocumentReference");
    assert_eq!(wire["status"], "current");
    let attachment = &wire["content"][0]["attachment"];
    assert_eq!(attachment["contentType"], "text/plain");
    assert_eq!(attachment["title"], "Intake checklist");
    assert_eq!(attachment["data"], "QXNrIGFib3V0IHNsZWVwLg==");

    let mut echoed: DocumentReference = serde_json::from_value(wire).unwrap();
    echoed.id = Some("d-1".to_string());
    let record = document_from_reference(echoed);
    assert_eq!(record.id, "d-1");
    assert_eq!(record.title, "Intake checklist");
    assert_eq!(record.content, "Ask about sleep.");
}

#[test]
fn document_without_attachment_is_untitled_and_empty() {
    let reference: DocumentReference =
        serde_json::from_value(json!({"resourceType": "DocumentReference", "id": "d-2"})).unwrap();
    let record = document_from_reference(reference);
    assert_eq!(record.title, UNTITLED);
    assert_eq!(record.content, "");
}

#[test]
fn note_references_patient_and_progress_note_code() {
    let reference = note_from_draft("p-1", "Discussed coping strategies.");
    let wire = serde_json::to_value(&reference).unwrap();

    assert_eq!(wire["subject"]["reference"], "Patient/p-1");
    assert_eq!(wire["type"]["coding"][0]["system"], "http://loinc.org");
    assert_eq!(wire["type"]["coding"][0]["code"], "11506-3");

    let note = note_from_reference(reference);
    assert_eq!(note.client_id, "p-1");
    assert_eq!(note.content, "Discussed coping strategies.");
}

#[test]
fn bundle_without_entries_is_an_empty_collection() {
    let bundle: Bundle<Patient> =
        serde_json::from_value(json!({"resourceType": "Bundle", "type": "searchset", "total": 0}))
            .unwrap();
    let clients = records_from_bundle(bundle, client_from_patient);
    assert!(clients.is_empty());
}

#[test]
fn bundle_entries_are_mapped_in_order() {
    let bundle: Bundle<Patient> = serde_json::from_value(json!({
        "resourceType": "Bundle",
        "entry": [
            {"resource": {"resourceType": "Patient", "id": "a", "name": "Ann Lee"}},
            {"fullUrl": "urn:uuid:no-resource"},
            {"resource": {"resourceType": "Patient", "id": "b", "name": ["Bo", "Park"]}}
        ]
    }))
    .unwrap();

    let clients = records_from_bundle(bundle, client_from_patient);
    let names: Vec<_> = clients.iter().map(|c| c.display_name()).collect();
    assert_eq!(names, ["Ann Lee", "Bo Park"]);
}

#[test]
fn bundle_skips_entries_of_other_resource_types() {
    let bundle: Bundle<Patient> = serde_json::from_value(json!({
        "resourceType": "Bundle",
        "entry": [
            {"resource": {
                "resourceType": "OperationOutcome",
                "issue": [{"severity": "warning", "code": "processing"}]
            }},
            {"resource": {"resourceType": "Patient", "id": "a", "name": "Ann Lee"}}
        ]
    }))
    .unwrap();

    let clients = records_from_bundle(bundle, client_from_patient);
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].id(), "a");
}

#[test]
fn document_bundle_skips_included_patients() {
    let bundle: Bundle<DocumentReference> = serde_json::from_value(json!({
        "resourceType": "Bundle",
        "entry": [
            {"resource": {"resourceType": "Patient", "id": "p-1"}},
            {"resource": {
                "resourceType": "DocumentReference",
                "id": "d-1",
                "content": [{"attachment": {"title": "Sleep hygiene", "data": "U2xlZXA="}}]
            }}
        ]
    }))
    .unwrap();

    let documents = records_from_bundle(bundle, document_from_reference);
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "Sleep hygiene");
    assert_eq!(documents[0].content, "Sleep");
}
