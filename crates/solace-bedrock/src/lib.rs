//! solace-bedrock
//!
//! Chat assistant for therapists via the Bedrock Converse API.

pub mod chat;
pub mod error;
