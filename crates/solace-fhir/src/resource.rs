//! FHIR R4 wire types.
//!
//! Only the members Solace reads or writes are modeled. Everything else is
//! kept in `other` so a read-modify-write PUT does not drop data written by
//! other systems.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use solace_core::models::name::one_or_many;

pub const PATIENT: &str = "Patient";
pub const DOCUMENT_REFERENCE: &str = "DocumentReference";

/// A resource that can appear in a search bundle.
///
/// Search bundles may mix in other resource types (an `OperationOutcome`
/// with warnings, `_include` results); only entries whose `resourceType`
/// matches are the search hits.
pub trait FhirResource {
    const RESOURCE_TYPE: &'static str;

    fn resource_type(&self) -> &str;

    fn is_expected_type(&self) -> bool {
        self.resource_type() == Self::RESOURCE_TYPE
    }
}

impl FhirResource for Patient {
    const RESOURCE_TYPE: &'static str = PATIENT;

    fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

impl FhirResource for DocumentReference {
    const RESOURCE_TYPE: &'static str = DOCUMENT_REFERENCE;

    fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default = "patient_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<WireName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// `Patient.name` as found in the store: a bare string, a list (of strings
/// or HumanName objects), or a single HumanName object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireName {
    Text(String),
    List(Vec<NameEntry>),
    Single(HumanName),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameEntry {
    Text(String),
    Human(HumanName),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prefix: Vec<String>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// A FHIR extension entry. Only the two value types Solace writes are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReference {
    #[serde(default = "document_reference_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default)]
    pub content: Vec<DocumentContent>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Base64-encoded payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// A search-result bundle. `entry` is absent when nothing matched.
#[derive(Debug, Clone, Deserialize)]
pub struct Bundle<T> {
    #[serde(default = "Vec::new")]
    pub entry: Vec<BundleEntry<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundleEntry<T> {
    #[serde(default = "Option::default")]
    pub resource: Option<T>,
}

fn patient_type() -> String {
    PATIENT.to_string()
}

fn document_reference_type() -> String {
    DOCUMENT_REFERENCE.to_string()
}
