use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// A session progress note attached to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NoteRecord {
    pub id: String,
    pub client_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NoteDraft {
    pub content: String,
}

impl NoteDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.content.trim().is_empty() {
            return Err(CoreError::MissingField("content".to_string()));
        }
        Ok(())
    }
}
