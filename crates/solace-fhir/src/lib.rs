//! solace-fhir
//!
//! Adapter for the HealthLake FHIR store: SigV4 request signing, mapping
//! between domain records and FHIR resources, the signed REST client, and
//! control-plane calls (datastore lookup, export jobs).

pub mod client;
pub mod datastore;
pub mod error;
pub mod mapper;
pub mod resource;
pub mod signer;
