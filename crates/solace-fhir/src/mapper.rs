//! Mapping between domain records and FHIR resources.
//!
//! The data store has no native status field for patients, so status and
//! next session travel as extension entries keyed by fixed URLs. That
//! encoding stays inside this module; the rest of the system works with
//! [`ClientStatus`] directly.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use solace_core::models::client::{ClientDraft, ClientRecord, ClientStatus};
use solace_core::models::document::{DEFAULT_CONTENT_TYPE, DocumentDraft, DocumentRecord};
use solace_core::models::name::ClientName;
use solace_core::models::note::NoteRecord;

use crate::resource::{
    Attachment, Bundle, CodeableConcept, Coding, ContactPoint, DOCUMENT_REFERENCE,
    DocumentContent, DocumentReference, Extension, FhirResource, HumanName, NameEntry, PATIENT,
    Patient, Reference, WireName,
};

pub const NEXT_SESSION_URL: &str = "http://example.com/nextSession";
pub const STATUS_URL: &str = "http://example.com/status";

pub const UNTITLED: &str = "Untitled";

const EMAIL_SYSTEM: &str = "email";
const DOCUMENT_STATUS_CURRENT: &str = "current";
const LOINC_SYSTEM: &str = "http://loinc.org";
const PROGRESS_NOTE_CODE: &str = "11506-3";
const PROGRESS_NOTE_DISPLAY: &str = "Progress note";

// ── Patient ──────────────────────────────────────────────────────────────────

/// Build a new Patient resource from a draft. Status defaults to `Active`.
pub fn patient_from_draft(draft: &ClientDraft) -> Patient {
    let mut patient = Patient {
        resource_type: PATIENT.to_string(),
        ..Patient::default()
    };
    apply_draft(&mut patient, draft, draft.status.unwrap_or(ClientStatus::Active));
    patient
}

/// Overwrite the fields a draft controls, leaving unrelated extensions and
/// members in place. The resource id is never touched.
pub fn apply_draft(patient: &mut Patient, draft: &ClientDraft, status: ClientStatus) {
    patient.name = Some(WireName::List(vec![NameEntry::Human(human_name(&draft.name))]));
    set_email(&mut patient.telecom, &draft.email);
    match &draft.next_session {
        Some(next_session) => set_next_session_extension(&mut patient.extension, next_session),
        None => patient.extension.retain(|ext| ext.url != NEXT_SESSION_URL),
    }
    set_status_extension(&mut patient.extension, status);
}

/// Map a Patient back to a client record. Total: missing members become
/// empty strings or unset options.
pub fn client_from_patient(patient: Patient) -> ClientRecord {
    let name = patient
        .name
        .map(client_name)
        .unwrap_or_else(|| ClientName::Parts(Vec::new()));

    let email = patient
        .telecom
        .iter()
        .find(|cp| cp.system.as_deref() == Some(EMAIL_SYSTEM))
        .and_then(|cp| cp.value.clone())
        .unwrap_or_default();

    ClientRecord::new(
        patient.id.unwrap_or_default(),
        name,
        email,
        next_session(&patient.extension),
        status(&patient.extension),
    )
}

/// Read the status extension. `None` when there is no entry or its value
/// is not a known status.
pub fn status(extensions: &[Extension]) -> Option<ClientStatus> {
    extensions
        .iter()
        .find(|ext| ext.url == STATUS_URL)
        .and_then(|ext| ext.value_string.as_deref())
        .and_then(ClientStatus::from_wire)
}

pub fn next_session(extensions: &[Extension]) -> Option<String> {
    extensions
        .iter()
        .find(|ext| ext.url == NEXT_SESSION_URL)
        .and_then(|ext| ext.value_date_time.clone())
}

/// Set the status entry in place, appending one only if none exists.
pub fn set_status_extension(extensions: &mut Vec<Extension>, status: ClientStatus) {
    let value = status.as_str().to_string();
    match extensions.iter_mut().find(|ext| ext.url == STATUS_URL) {
        Some(ext) => ext.value_string = Some(value),
        None => extensions.push(Extension {
            url: STATUS_URL.to_string(),
            value_string: Some(value),
            ..Extension::default()
        }),
    }
}

fn set_next_session_extension(extensions: &mut Vec<Extension>, next_session: &str) {
    let value = next_session.to_string();
    match extensions.iter_mut().find(|ext| ext.url == NEXT_SESSION_URL) {
        Some(ext) => ext.value_date_time = Some(value),
        None => extensions.push(Extension {
            url: NEXT_SESSION_URL.to_string(),
            value_date_time: Some(value),
            ..Extension::default()
        }),
    }
}

fn set_email(telecom: &mut Vec<ContactPoint>, email: &str) {
    match telecom
        .iter_mut()
        .find(|cp| cp.system.as_deref() == Some(EMAIL_SYSTEM))
    {
        Some(cp) => cp.value = Some(email.to_string()),
        None => telecom.push(ContactPoint {
            system: Some(EMAIL_SYSTEM.to_string()),
            value: Some(email.to_string()),
            ..ContactPoint::default()
        }),
    }
}

fn human_name(name: &ClientName) -> HumanName {
    let mut human = match name {
        ClientName::Plain(text) => HumanName {
            given: vec![text.trim().to_string()],
            ..HumanName::default()
        },
        ClientName::Parts(parts) => HumanName {
            given: parts.clone(),
            ..HumanName::default()
        },
        ClientName::Structured {
            prefix,
            given,
            family,
        } => HumanName {
            prefix: prefix.clone(),
            given: given.clone(),
            family: family.clone(),
            ..HumanName::default()
        },
    };
    human.text = Some(name.display_name());
    human
}

fn client_name(name: WireName) -> ClientName {
    match name {
        WireName::Text(text) => ClientName::Plain(text),
        WireName::Single(human) => from_human_name(human),
        WireName::List(entries) => {
            // The first structured entry wins; a list of bare strings is a
            // list of parts.
            let mut parts = Vec::new();
            for entry in entries {
                match entry {
                    NameEntry::Human(human) => return from_human_name(human),
                    NameEntry::Text(text) => parts.push(text),
                }
            }
            ClientName::Parts(parts)
        }
    }
}

fn from_human_name(human: HumanName) -> ClientName {
    let has_parts = human
        .prefix
        .iter()
        .chain(&human.given)
        .chain(&human.family)
        .any(|part| !part.trim().is_empty());

    match human.text {
        Some(text) if !has_parts => ClientName::Plain(text),
        _ => ClientName::Structured {
            prefix: human.prefix,
            given: human.given,
            family: human.family,
        },
    }
}

// ── DocumentReference ────────────────────────────────────────────────────────

/// Build a knowledge-base DocumentReference with one base64 attachment.
pub fn document_from_draft(draft: &DocumentDraft) -> DocumentReference {
    DocumentReference {
        resource_type: DOCUMENT_REFERENCE.to_string(),
        status: Some(DOCUMENT_STATUS_CURRENT.to_string()),
        content: vec![attachment(
            &draft.content_type,
            &draft.content,
            Some(draft.title.clone()),
        )],
        ..DocumentReference::default()
    }
}

pub fn document_from_reference(reference: DocumentReference) -> DocumentRecord {
    let attachment = first_attachment(&reference);
    DocumentRecord {
        id: reference.id.clone().unwrap_or_default(),
        title: attachment
            .and_then(|a| a.title.clone())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        content: attachment
            .and_then(|a| a.data.as_deref())
            .map(decode_content)
            .unwrap_or_default(),
    }
}

/// Build a progress-note DocumentReference whose subject is the patient.
pub fn note_from_draft(client_id: &str, content: &str) -> DocumentReference {
    DocumentReference {
        resource_type: DOCUMENT_REFERENCE.to_string(),
        status: Some(DOCUMENT_STATUS_CURRENT.to_string()),
        doc_type: Some(CodeableConcept {
            coding: vec![Coding {
                system: Some(LOINC_SYSTEM.to_string()),
                code: Some(PROGRESS_NOTE_CODE.to_string()),
                display: Some(PROGRESS_NOTE_DISPLAY.to_string()),
            }],
        }),
        subject: Some(Reference {
            reference: Some(patient_reference(client_id)),
        }),
        content: vec![attachment(DEFAULT_CONTENT_TYPE, content, None)],
        ..DocumentReference::default()
    }
}

pub fn note_from_reference(reference: DocumentReference) -> NoteRecord {
    let client_id = reference
        .subject
        .as_ref()
        .and_then(|s| s.reference.as_deref())
        .and_then(|r| r.strip_prefix("Patient/"))
        .unwrap_or_default()
        .to_string();
    let content = first_attachment(&reference)
        .and_then(|a| a.data.as_deref())
        .map(decode_content)
        .unwrap_or_default();

    NoteRecord {
        id: reference.id.unwrap_or_default(),
        client_id,
        content,
    }
}

pub fn patient_reference(client_id: &str) -> String {
    format!("{PATIENT}/{client_id}")
}

fn attachment(content_type: &str, content: &str, title: Option<String>) -> DocumentContent {
    DocumentContent {
        attachment: Some(Attachment {
            content_type: Some(content_type.to_string()),
            data: Some(STANDARD.encode(content.as_bytes())),
            title,
        }),
    }
}

fn first_attachment(reference: &DocumentReference) -> Option<&Attachment> {
    reference.content.first().and_then(|c| c.attachment.as_ref())
}

/// Decode base64 attachment data. Data that is not base64 text is returned
/// as stored.
fn decode_content(data: &str) -> String {
    STANDARD
        .decode(data.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| data.to_string())
}

// ── Search bundles ───────────────────────────────────────────────────────────

/// Map every resource of the searched type in a bundle. Entries of other
/// types are skipped. A bundle without entries maps to an empty list.
pub fn records_from_bundle<T, R>(bundle: Bundle<T>, map: impl Fn(T) -> R) -> Vec<R>
where
    T: FhirResource,
{
    bundle
        .entry
        .into_iter()
        .filter_map(|entry| entry.resource)
        .filter(FhirResource::is_expected_type)
        .map(map)
        .collect()
}
